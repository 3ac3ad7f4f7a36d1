//! Command grammar for the interactive prompt
//!
//! One line of input becomes one [`Command`]. The grammar:
//!
//! ```text
//! create <text_size> <data_size>
//! allocate <pid> <var_name> <char|short|int|float|long|double> <count>
//! set <pid> <var_name> <offset> <v0> <v1> ... <vN>
//! free <pid> <var_name>
//! terminate <pid>
//! print mmu | page | processes | <pid>:<var_name>
//! exit
//! ```
//!
//! Parse failures come back as ready-to-print `error: ...` lines; the
//! session echoes them and keeps going.

use crate::memory::DataType;
use std::str::FromStr;

/// A fully parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        text_size: u32,
        data_size: u32,
    },
    Allocate {
        pid: u32,
        var_name: String,
        data_type: DataType,
        num_elements: u32,
    },
    Set {
        pid: u32,
        var_name: String,
        offset: u32,
        values: Vec<String>,
    },
    Free {
        pid: u32,
        var_name: String,
    },
    Terminate {
        pid: u32,
    },
    PrintMmu,
    PrintPage,
    PrintProcesses,
    PrintVariable {
        pid: u32,
        var_name: String,
    },
    Exit,
}

/// Parse one command line
pub fn parse_command(line: &str) -> Result<Command, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = tokens.split_first() else {
        return Err("error: empty command".to_string());
    };

    match verb {
        "create" => {
            let [text, data] = expect_args(verb, args)?;
            Ok(Command::Create {
                text_size: parse_number(text, "text size")?,
                data_size: parse_number(data, "data size")?,
            })
        }
        "allocate" => {
            let [pid, name, data_type, count] = expect_args(verb, args)?;
            Ok(Command::Allocate {
                pid: parse_number(pid, "pid")?,
                var_name: name.to_string(),
                data_type: DataType::from_str(data_type).map_err(|e| format!("error: {}", e))?,
                num_elements: parse_number(count, "element count")?,
            })
        }
        "set" => {
            if args.len() < 4 {
                return Err(usage_error(verb));
            }
            Ok(Command::Set {
                pid: parse_number(args[0], "pid")?,
                var_name: args[1].to_string(),
                offset: parse_number(args[2], "offset")?,
                values: args[3..].iter().map(|s| s.to_string()).collect(),
            })
        }
        "free" => {
            let [pid, name] = expect_args(verb, args)?;
            Ok(Command::Free {
                pid: parse_number(pid, "pid")?,
                var_name: name.to_string(),
            })
        }
        "terminate" => {
            let [pid] = expect_args(verb, args)?;
            Ok(Command::Terminate {
                pid: parse_number(pid, "pid")?,
            })
        }
        "print" => {
            let [target] = expect_args(verb, args)?;
            parse_print_target(target)
        }
        "exit" => Ok(Command::Exit),
        _ => Err(format!("error: unknown command '{}'", verb)),
    }
}

fn parse_print_target(target: &str) -> Result<Command, String> {
    match target {
        "mmu" => Ok(Command::PrintMmu),
        "page" => Ok(Command::PrintPage),
        "processes" => Ok(Command::PrintProcesses),
        _ => {
            let Some((pid, var_name)) = target.split_once(':') else {
                return Err(format!("error: unknown print target '{}'", target));
            };
            Ok(Command::PrintVariable {
                pid: parse_number(pid, "pid")?,
                var_name: var_name.to_string(),
            })
        }
    }
}

fn parse_number(token: &str, what: &str) -> Result<u32, String> {
    token
        .parse::<u32>()
        .map_err(|_| format!("error: invalid {} '{}'", what, token))
}

fn expect_args<'a, const N: usize>(verb: &str, args: &[&'a str]) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args).map_err(|_| usage_error(verb))
}

fn usage_error(verb: &str) -> String {
    format!("error: wrong number of arguments for '{}'", verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        assert_eq!(
            parse_command("create 100 50"),
            Ok(Command::Create {
                text_size: 100,
                data_size: 50
            })
        );
    }

    #[test]
    fn test_parse_allocate() {
        assert_eq!(
            parse_command("allocate 1024 x int 10"),
            Ok(Command::Allocate {
                pid: 1024,
                var_name: "x".to_string(),
                data_type: DataType::Int,
                num_elements: 10,
            })
        );
    }

    #[test]
    fn test_parse_allocate_bad_type() {
        let err = parse_command("allocate 1024 x string 10").unwrap_err();
        assert!(err.starts_with("error:"), "unexpected message: {}", err);
    }

    #[test]
    fn test_parse_set_collects_values() {
        let cmd = parse_command("set 1024 x 2 1 2 3").unwrap();
        match cmd {
            Command::Set {
                pid,
                var_name,
                offset,
                values,
            } => {
                assert_eq!(pid, 1024);
                assert_eq!(var_name, "x");
                assert_eq!(offset, 2);
                assert_eq!(values, vec!["1", "2", "3"]);
            }
            other => panic!("expected set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_print_targets() {
        assert_eq!(parse_command("print mmu"), Ok(Command::PrintMmu));
        assert_eq!(parse_command("print page"), Ok(Command::PrintPage));
        assert_eq!(parse_command("print processes"), Ok(Command::PrintProcesses));
        assert_eq!(
            parse_command("print 1024:x"),
            Ok(Command::PrintVariable {
                pid: 1024,
                var_name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_command("defragment now").is_err());
        assert!(parse_command("terminate abc").is_err());
        assert!(parse_command("free 1024").is_err());
    }
}
