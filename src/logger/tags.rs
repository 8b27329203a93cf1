/// Log tags identify the subsystem that produced a message

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Cache,
    Pool,
    Venue,
    Compiler,
    Relay,
    Rpc,
    Swap,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Pool => "pool".to_string(),
            LogTag::Venue => "venue".to_string(),
            LogTag::Compiler => "compiler".to_string(),
            LogTag::Relay => "relay".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Swap => "swap".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label for the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(s) => s.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
