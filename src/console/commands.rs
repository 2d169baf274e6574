//! Static command table.
//!
//! One row per console command: the exact name the operator types, a
//! dispatch tag, inclusive bounds on the argument count (excluding the
//! name itself), and the help/usage strings the `help` command and the
//! usage error report. Registered once, looked up by exact case-sensitive
//! match, first match wins; names are unique.

/// Dispatch tag — the [`Shell`](super::shell::Shell) matches on this to
/// run the handler, so the table stays a plain static with no function
/// pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Halt,
    PastFormat,
    PastRead,
    PastWrite,
    PastErase,
    PastDump,
    Temp,
    TempAlert,
    Rfm,
    Rtc,
    Power,
}

/// Immutable command descriptor.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    /// Minimum argument count, excluding the command name.
    pub min_args: u8,
    /// Maximum argument count, excluding the command name.
    pub max_args: u8,
    pub help: &'static str,
    pub usage: &'static str,
}

/// All console commands, in registration order.
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        min_args: 0,
        max_args: 0,
        help: "Print help",
        usage: "",
    },
    CommandSpec {
        name: "halt",
        kind: CommandKind::Halt,
        min_args: 0,
        max_args: 64,
        help: "Halt the system",
        usage: "<arg> ... <arg>",
    },
    CommandSpec {
        name: "pastformat",
        kind: CommandKind::PastFormat,
        min_args: 0,
        max_args: 0,
        help: "Format parameter storage",
        usage: "",
    },
    CommandSpec {
        name: "pastread",
        kind: CommandKind::PastRead,
        min_args: 1,
        max_args: 1,
        help: "Read unit from storage",
        usage: "<unit>",
    },
    CommandSpec {
        name: "pastwrite",
        kind: CommandKind::PastWrite,
        min_args: 2,
        max_args: 2,
        help: "Write unit to storage",
        usage: "<unit> <data>",
    },
    CommandSpec {
        name: "pasterase",
        kind: CommandKind::PastErase,
        min_args: 1,
        max_args: 1,
        help: "Erase unit from storage",
        usage: "<unit>",
    },
    CommandSpec {
        name: "pastdump",
        kind: CommandKind::PastDump,
        min_args: 0,
        max_args: 1,
        help: "Dump raw storage blocks",
        usage: "[<size>]",
    },
    CommandSpec {
        name: "temp",
        kind: CommandKind::Temp,
        min_args: 0,
        max_args: 0,
        help: "Show TMP102 temperature",
        usage: "",
    },
    CommandSpec {
        name: "tempalert",
        kind: CommandKind::TempAlert,
        min_args: 0,
        max_args: 2,
        help: "Show or set TMP102 alert",
        usage: "[<low> <high>]",
    },
    CommandSpec {
        name: "rfm",
        kind: CommandKind::Rfm,
        min_args: 0,
        max_args: 3,
        help: "Handle RFM69 radio",
        usage: "[init | id | net | gw | pwr | key | tx] ...",
    },
    CommandSpec {
        name: "rtc",
        kind: CommandKind::Rtc,
        min_args: 0,
        max_args: 0,
        help: "Show wakeup clock",
        usage: "",
    },
    CommandSpec {
        name: "power",
        kind: CommandKind::Power,
        min_args: 1,
        max_args: 1,
        help: "Handle low power mode",
        usage: "<low | normal>",
    },
];

/// Exact, case-sensitive lookup; first match wins.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

impl CommandSpec {
    /// Whether `args` (excluding the command name) is inside the bounds.
    pub fn arity_ok(&self, args: usize) -> bool {
        args >= self.min_args as usize && args <= self.max_args as usize
    }
}
