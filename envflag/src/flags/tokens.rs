//! Pre-filtering of command-line tokens before `clap` sees them.
//!
//! Loading tolerates arguments meant for someone else: unknown flags are
//! dropped together with a detached value, and positional tokens are dropped
//! unless the command declares positional arguments.

use clap::{Arg, Command};

const END_OF_FLAGS: &str = "--";

enum Token<'a> {
    Long { name: &'a str, inline: bool },
    Short { cluster: &'a str },
    Plain,
}

fn classify(token: &str) -> Token<'_> {
    if let Some(body) = token.strip_prefix(END_OF_FLAGS) {
        return match body.split_once('=') {
            Some((name, _)) => Token::Long { name, inline: true },
            None => Token::Long {
                name: body,
                inline: false,
            },
        };
    }
    match token.strip_prefix('-') {
        Some(cluster) if !cluster.is_empty() => Token::Short { cluster },
        _ => Token::Plain,
    }
}

/// Whether a known flag written without `=` consumes the following token.
fn takes_detached_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
        && !arg.is_require_equals_set()
        && arg
            .get_num_args()
            .is_none_or(|range| range.min_values() > 0)
}

fn find_long<'c>(command: &'c Command, name: &str) -> Option<&'c Arg> {
    command.get_arguments().find(|arg| {
        arg.get_long() == Some(name)
            || arg
                .get_all_aliases()
                .is_some_and(|aliases| aliases.contains(&name))
    })
}

fn find_short(command: &Command, short: char) -> Option<&Arg> {
    command
        .get_arguments()
        .find(|arg| arg.get_short() == Some(short))
}

fn is_builtin_long(command: &Command, name: &str) -> bool {
    match name {
        "help" => !command.is_disable_help_flag_set(),
        "version" => command.get_version().is_some() && !command.is_disable_version_flag_set(),
        _ => false,
    }
}

fn is_builtin_short(command: &Command, short: char) -> bool {
    match short {
        'h' => !command.is_disable_help_flag_set(),
        'V' => command.get_version().is_some() && !command.is_disable_version_flag_set(),
        _ => false,
    }
}

/// Returns the subset of `tokens` that `command` understands, in order.
pub(super) fn retain_known(command: &Command, tokens: &[String]) -> Vec<String> {
    let accepts_positionals = command.get_positionals().next().is_some();
    let mut kept = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        if token == END_OF_FLAGS {
            if accepts_positionals {
                kept.push(token.clone());
                kept.extend(iter.cloned());
            }
            break;
        }

        let (known, detached) = match classify(token) {
            Token::Long { name, inline } => match find_long(command, name) {
                Some(arg) => (true, !inline && takes_detached_value(arg)),
                None => (is_builtin_long(command, name), !inline),
            },
            Token::Short { cluster } => {
                let mut chars = cluster.chars();
                let first = chars.next();
                let rest_empty = chars.as_str().is_empty();
                match first.and_then(|c| find_short(command, c)) {
                    Some(arg) => (true, rest_empty && takes_detached_value(arg)),
                    None => (
                        first.is_some_and(|c| is_builtin_short(command, c)),
                        rest_empty,
                    ),
                }
            }
            Token::Plain => {
                if accepts_positionals {
                    kept.push(token.clone());
                }
                continue;
            }
        };

        if known {
            kept.push(token.clone());
            if detached && let Some(value) = iter.next() {
                kept.push(value.clone());
            }
        } else {
            let skipped = if detached {
                iter.next_if(|next| !next.starts_with('-'))
            } else {
                None
            };
            tracing::trace!(token = %token, skipped = ?skipped, "dropping unknown flag");
        }
    }
    kept
}
