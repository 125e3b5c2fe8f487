/// 驱动的静态描述信息，只有元数据，不参与解码。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonInfo {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    pub supply_voltage_min_v: f32,
    pub supply_voltage_max_v: f32,
    pub max_current_ma: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    /// 形如 1000 表示 1.0.0。
    pub driver_version: u32,
}

const INFO: ButtonInfo = ButtonInfo {
    chip_name: "General BUTTON",
    manufacturer_name: "General",
    interface: "GPIO",
    supply_voltage_min_v: 1.8,
    supply_voltage_max_v: 5.5,
    max_current_ma: 1.0,
    temperature_min: -40.0,
    temperature_max: 125.0,
    driver_version: 1000,
};

/// 返回固定的描述信息，无副作用。
pub const fn info() -> ButtonInfo {
    INFO
}
