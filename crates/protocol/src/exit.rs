/// Process exit codes. Meanings are stable across commands; new values may be
/// added but existing ones are never repurposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    Ok,
    Unknown,
    /// Bad arguments or an outgoing payload that failed validation.
    Usage,
    NotFound,
    Auth,
    Forbidden,
    /// DNS, timeout, unreachable host.
    Network,
    /// 5xx from the remote API.
    Server,
    /// A response that does not match the expected schema.
    Contract,
}

impl ExitCode {
    pub const fn code(self) -> u8 {
        match self {
            ExitCode::Ok => 0,
            ExitCode::Unknown => 1,
            ExitCode::Usage => 2,
            ExitCode::NotFound => 3,
            ExitCode::Auth => 4,
            ExitCode::Forbidden => 5,
            ExitCode::Network => 10,
            ExitCode::Server => 11,
            ExitCode::Contract => 12,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}
