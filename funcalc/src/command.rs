//! Command line grammar
//!
//! One line holds one command. Arguments are whitespace separated and every
//! command rejects arguments beyond the ones it declares.

use funcalc_core::CalcError;
use std::str::SplitWhitespace;

/// A parsed command. Operation indices are still raw user input; they are
/// resolved against the registry when the command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Eval { index: i64, order: usize },
    Scal(i64),
    Add(i64, i64),
    Sub(i64, i64),
    Comp(i64, i64),
    Iden,
    Tran,
    Del(i64),
    Resize(i64),
    Read(String),
    Help,
    Exit,
}

/// Help metadata for a command
#[derive(Debug, Clone, Copy)]
pub struct CommandMeta {
    pub name: &'static str,
    pub args: &'static [&'static str],
    pub description: &'static str,
}

impl CommandMeta {
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for arg in self.args {
            usage.push_str(&format!(" <{}>", arg));
        }
        usage
    }
}

pub static COMMANDS: [CommandMeta; 12] = [
    CommandMeta {
        name: "eval", args: &["opIndex", "order"],
        description: "compute the result of operation #opIndex on order x order matrices (they will be prompted)",
    },
    CommandMeta {
        name: "scal", args: &["value"],
        description: "create an operation that multiplies the given matrix by value",
    },
    CommandMeta {
        name: "add", args: &["opIndex1", "opIndex2"],
        description: "create an operation that adds the results of operations #opIndex1 and #opIndex2",
    },
    CommandMeta {
        name: "sub", args: &["opIndex1", "opIndex2"],
        description: "create an operation that subtracts the result of #opIndex2 from the result of #opIndex1",
    },
    CommandMeta {
        name: "comp", args: &["opIndex1", "opIndex2"],
        description: "create an operation that applies #opIndex1 to the result of #opIndex2",
    },
    CommandMeta {
        name: "iden", args: &[],
        description: "create an identity operation",
    },
    CommandMeta {
        name: "tran", args: &[],
        description: "create a transpose operation",
    },
    CommandMeta {
        name: "del", args: &["opIndex"],
        description: "delete operation #opIndex from the operation list",
    },
    CommandMeta {
        name: "resize", args: &["capacity"],
        description: "change the maximum number of operations",
    },
    CommandMeta {
        name: "read", args: &["path"],
        description: "run the commands in a file",
    },
    CommandMeta {
        name: "help", args: &[],
        description: "print this command list",
    },
    CommandMeta {
        name: "exit", args: &[],
        description: "exit the program",
    },
];

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CalcError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let mut args = Args { command: name, tokens };

        let command = match name {
            "eval" => {
                let index = args.int("opIndex")?;
                let order = args.int("order")?;
                let order = usize::try_from(order)
                    .map_err(|_| CalcError::invalid_size(order, funcalc_core::MAX_ORDER))?;
                Command::Eval { index, order }
            }
            "scal" => Command::Scal(args.int("value")?),
            "add" => Command::Add(args.int("opIndex1")?, args.int("opIndex2")?),
            "sub" => Command::Sub(args.int("opIndex1")?, args.int("opIndex2")?),
            "comp" => Command::Comp(args.int("opIndex1")?, args.int("opIndex2")?),
            "iden" => Command::Iden,
            "tran" => Command::Tran,
            "del" => Command::Del(args.int("opIndex")?),
            "resize" => Command::Resize(args.int("capacity")?),
            "read" => Command::Read(args.word("path")?.to_string()),
            "help" => Command::Help,
            "exit" => Command::Exit,
            other => return Err(CalcError::unknown_command(other)),
        };

        args.finish()?;
        Ok(Some(command))
    }

    pub fn meta(&self) -> &'static CommandMeta {
        let index = match self {
            Command::Eval { .. } => 0,
            Command::Scal(_) => 1,
            Command::Add(..) => 2,
            Command::Sub(..) => 3,
            Command::Comp(..) => 4,
            Command::Iden => 5,
            Command::Tran => 6,
            Command::Del(_) => 7,
            Command::Resize(_) => 8,
            Command::Read(_) => 9,
            Command::Help => 10,
            Command::Exit => 11,
        };
        &COMMANDS[index]
    }
}

struct Args<'a> {
    command: &'a str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn word(&mut self, arg: &str) -> Result<&'a str, CalcError> {
        self.tokens.next()
            .ok_or_else(|| CalcError::missing_argument(self.command, arg))
    }

    fn int(&mut self, arg: &str) -> Result<i64, CalcError> {
        let token = self.word(arg)?;
        token.parse().map_err(|_| CalcError::not_a_number(token))
    }

    fn finish(self) -> Result<(), CalcError> {
        let rest: Vec<&str> = self.tokens.collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(CalcError::extra_input(&rest.join(" ")))
        }
    }
}
