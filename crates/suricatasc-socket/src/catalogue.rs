//! Argument tables for management commands.
//!
//! The engine expects named arguments while operators type positional ones.
//! Each [`CommandSpec`] lists a command's parameters in the order they are
//! typed. Commands missing from the table take no arguments. When every
//! parameter of a command is required, surplus tokens are joined with single
//! spaces into the last parameter so values such as JSON documents survive
//! the split.

use serde_json::{Map, Value};

use crate::SessionError;

/// How a positional token is converted into a JSON argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Passed through as a JSON string.
    Text,
    /// Parsed as a signed integer.
    Integer,
    /// Parsed as a boolean (`true`/`false`, `yes`/`no`, `1`/`0`).
    Switch,
    /// Always sent as `true` and never consumes a token.
    Implied,
}

/// A single named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Key used in the request's `arguments` object.
    pub name: &'static str,
    /// Conversion applied to the positional token.
    pub kind: ArgumentKind,
    /// Whether the command fails locally when the token is absent.
    pub required: bool,
}

/// Parameters accepted by one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name as sent to the engine.
    pub name: &'static str,
    /// Parameters in typing order.
    pub arguments: &'static [ArgumentSpec],
}

impl CommandSpec {
    /// Number of positional tokens the command can consume.
    #[must_use]
    pub fn positional_capacity(&self) -> usize {
        self.arguments
            .iter()
            .filter(|argument| argument.kind != ArgumentKind::Implied)
            .count()
    }

    /// True when no positional parameter is optional.
    #[must_use]
    pub fn all_required(&self) -> bool {
        self.arguments
            .iter()
            .all(|argument| argument.required || argument.kind == ArgumentKind::Implied)
    }
}

const fn text(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Text,
        required: true,
    }
}

const fn integer(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Integer,
        required: true,
    }
}

const fn optional(spec: ArgumentSpec) -> ArgumentSpec {
    ArgumentSpec {
        required: false,
        ..spec
    }
}

const fn switch(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Switch,
        required: false,
    }
}

const fn implied(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Implied,
        required: true,
    }
}

const TENANT_HANDLER: &[ArgumentSpec] = &[integer("id"), text("htype"), optional(integer("hargs"))];
const DATASET_VALUE: &[ArgumentSpec] = &[text("setname"), text("settype"), text("datavalue")];

/// Commands that take arguments, in the engine's parameter order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "pcap-file",
        arguments: &[
            text("filename"),
            text("output-dir"),
            optional(integer("tenant")),
            switch("continuous"),
            switch("delete-when-done"),
        ],
    },
    CommandSpec {
        name: "pcap-file-continuous",
        arguments: &[
            text("filename"),
            text("output-dir"),
            implied("continuous"),
            optional(integer("tenant")),
            switch("delete-when-done"),
        ],
    },
    CommandSpec {
        name: "iface-stat",
        arguments: &[text("iface")],
    },
    CommandSpec {
        name: "conf-get",
        arguments: &[text("variable")],
    },
    CommandSpec {
        name: "register-tenant-handler",
        arguments: TENANT_HANDLER,
    },
    CommandSpec {
        name: "unregister-tenant-handler",
        arguments: TENANT_HANDLER,
    },
    CommandSpec {
        name: "register-tenant",
        arguments: &[integer("id"), text("filename")],
    },
    CommandSpec {
        name: "reload-tenant",
        arguments: &[integer("id"), optional(text("filename"))],
    },
    CommandSpec {
        name: "unregister-tenant",
        arguments: &[integer("id")],
    },
    CommandSpec {
        name: "add-hostbit",
        arguments: &[text("ipaddress"), text("hostbit"), integer("expire")],
    },
    CommandSpec {
        name: "remove-hostbit",
        arguments: &[text("ipaddress"), text("hostbit")],
    },
    CommandSpec {
        name: "list-hostbit",
        arguments: &[text("ipaddress")],
    },
    CommandSpec {
        name: "memcap-set",
        arguments: &[text("config"), text("memcap")],
    },
    CommandSpec {
        name: "memcap-show",
        arguments: &[text("config")],
    },
    CommandSpec {
        name: "dataset-add",
        arguments: DATASET_VALUE,
    },
    CommandSpec {
        name: "dataset-remove",
        arguments: DATASET_VALUE,
    },
    CommandSpec {
        name: "dataset-lookup",
        arguments: DATASET_VALUE,
    },
    CommandSpec {
        name: "dataset-add-json",
        arguments: &[
            text("setname"),
            text("settype"),
            text("datavalue"),
            text("datajson"),
        ],
    },
    CommandSpec {
        name: "dataset-clear",
        arguments: &[text("setname"), text("settype")],
    },
    CommandSpec {
        name: "get-flow-stats-by-id",
        arguments: &[integer("flow_id")],
    },
];

/// Looks up the argument table for `command`.
#[must_use]
pub fn lookup(command: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == command)
}

/// Binds positional `tokens` to the named arguments of `command`.
pub fn bind_arguments(command: &str, tokens: &[String]) -> Result<Map<String, Value>, SessionError> {
    let Some(spec) = lookup(command) else {
        if tokens.is_empty() {
            return Ok(Map::new());
        }
        return Err(SessionError::UnexpectedArguments {
            command: command.to_owned(),
        });
    };

    let collapsed = join_tail(spec, tokens);
    let mut bound = Map::new();
    let mut positional = collapsed.as_deref().unwrap_or(tokens).iter();
    for argument in spec.arguments {
        if argument.kind == ArgumentKind::Implied {
            bound.insert(argument.name.to_owned(), Value::Bool(true));
            continue;
        }
        match positional.next() {
            Some(token) => {
                let value = convert(command, argument, token)?;
                bound.insert(argument.name.to_owned(), value);
            }
            None if argument.required => {
                return Err(SessionError::MissingArgument {
                    command: command.to_owned(),
                    argument: argument.name,
                });
            }
            None => {}
        }
    }

    if positional.next().is_some() {
        return Err(SessionError::TooManyArguments {
            command: command.to_owned(),
            expected: spec.positional_capacity(),
            received: tokens.len(),
        });
    }

    Ok(bound)
}

/// Folds surplus tokens of an all-required command into its last parameter.
fn join_tail(spec: &CommandSpec, tokens: &[String]) -> Option<Vec<String>> {
    let capacity = spec.positional_capacity();
    if capacity == 0 || tokens.len() <= capacity || !spec.all_required() {
        return None;
    }
    let (head, tail) = tokens.split_at_checked(capacity - 1)?;
    let mut collapsed = head.to_vec();
    collapsed.push(tail.join(" "));
    Some(collapsed)
}

fn convert(command: &str, argument: &ArgumentSpec, token: &str) -> Result<Value, SessionError> {
    match argument.kind {
        ArgumentKind::Text => Ok(Value::String(token.to_owned())),
        ArgumentKind::Integer => token
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| SessionError::InvalidInteger {
                command: command.to_owned(),
                argument: argument.name,
                value: token.to_owned(),
            }),
        ArgumentKind::Switch => parse_switch(token)
            .map(Value::Bool)
            .ok_or_else(|| SessionError::InvalidSwitch {
                command: command.to_owned(),
                argument: argument.name,
                value: token.to_owned(),
            }),
        ArgumentKind::Implied => Ok(Value::Bool(true)),
    }
}

fn parse_switch(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
