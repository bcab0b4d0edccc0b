#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum ShellCommand {
    CD,
    LS,
    CP,
    UL,
    DL,
}

impl ShellCommand {
    /// Command names are case-sensitive.
    pub fn from_str(cmd: &str) -> Option<ShellCommand> {
        match cmd {
            "cd" => Some(ShellCommand::CD),
            "ls" => Some(ShellCommand::LS),
            "cp" => Some(ShellCommand::CP),
            "ul" => Some(ShellCommand::UL),
            "dl" => Some(ShellCommand::DL),
            _ => None,
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            ShellCommand::CD => "cd <path>",
            ShellCommand::LS => "ls [-l] [path]",
            ShellCommand::CP => "cp <dst> <src>",
            ShellCommand::UL => "ul <destDir> <srcName>",
            ShellCommand::DL => "dl <dstName> <srcPath>",
        }
    }

    /// Whether `argc` words, command name included, is a valid call.
    pub fn accepts(&self, argc: usize) -> bool {
        match self {
            ShellCommand::CD => argc == 2,
            ShellCommand::LS => (1..=3).contains(&argc),
            ShellCommand::CP | ShellCommand::UL | ShellCommand::DL => argc == 3,
        }
    }
}
