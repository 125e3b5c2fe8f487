use core::fmt;

/// 驱动唯一的错误类别：误用。
///
/// 解码引擎本身不做 I/O 也不分配内存，所有错误都在触发它的调用处同步返回，
/// 且返回错误时句柄状态不会被修改。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 句柄尚未初始化（或已被 `deinit`）。
    NotInitialized,
    /// 句柄已经初始化，不能重复初始化或更换接口。
    AlreadyInitialized,
    /// 初始化前没有通过 `link` 提供接口。
    MissingInterface,
    /// 阈值必须为正。
    InvalidThreshold,
}

impl Error {
    /// 状态码，0 保留给成功。
    pub const fn code(self) -> u8 {
        match self {
            Error::NotInitialized => 1,
            Error::AlreadyInitialized => 2,
            Error::MissingInterface => 3,
            Error::InvalidThreshold => 4,
        }
    }
}

impl From<Error> for u8 {
    fn from(err: Error) -> Self {
        err.code()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NotInitialized => "button handle is not initialized",
            Error::AlreadyInitialized => "button handle is already initialized",
            Error::MissingInterface => "no interface linked to button handle",
            Error::InvalidThreshold => "threshold must be positive",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
