use parley_core::{Error, Result, RoutineKind, consume_token, consume_while, truncate_long};

/// Routine call described by a call string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    pub kind: RoutineKind,
    pub name: String,
    /// Total number of placeholders, the function result included.
    pub placeholders: usize,
}

/// Parse `{call name(?,…)}` or `{? = call name(?,…)}`.
///
/// The braces are optional, whitespace is ignored between tokens and the
/// parentheses may be omitted when there are no arguments.
pub fn parse_call(sql: &str) -> Result<CallDescriptor> {
    let error = || Error::msg(format!("Invalid call string `{}`", truncate_long!(sql)));
    let mut input = sql;
    let braced = consume_token(&mut input, "{");
    let kind = if consume_token(&mut input, "?") {
        if !consume_token(&mut input, "=") {
            return Err(error());
        }
        RoutineKind::Function
    } else {
        RoutineKind::Procedure
    };
    if !consume_token(&mut input, "call") {
        return Err(error());
    }
    let before = input.len();
    input = input.trim_ascii_start();
    if before == input.len() {
        return Err(error());
    }
    let name = consume_while(&mut input, |c| {
        c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '"')
    });
    if name.is_empty() {
        return Err(error());
    }
    let mut placeholders = 0;
    if consume_token(&mut input, "(") {
        if !consume_token(&mut input, ")") {
            loop {
                if !consume_token(&mut input, "?") {
                    return Err(error());
                }
                placeholders += 1;
                if consume_token(&mut input, ")") {
                    break;
                }
                if !consume_token(&mut input, ",") {
                    return Err(error());
                }
            }
        }
    }
    if braced && !consume_token(&mut input, "}") {
        return Err(error());
    }
    if !input.trim_ascii().is_empty() {
        return Err(error());
    }
    if kind == RoutineKind::Function {
        placeholders += 1;
    }
    Ok(CallDescriptor {
        kind,
        name: name.to_string(),
        placeholders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn procedure() {
        let call = parse_call("{call pkg.proc(?,?,?)}").unwrap();
        assert_eq!(call.kind, RoutineKind::Procedure);
        assert_eq!(call.name, "pkg.proc");
        assert_eq!(call.placeholders, 3);
        let call = parse_call("  { CALL pkg.proc ( ? , ? ) }  ").unwrap();
        assert_eq!(call.placeholders, 2);
        let call = parse_call("{call pkg.proc()}").unwrap();
        assert_eq!(call.placeholders, 0);
        let call = parse_call(indoc! {"
            {
                call pkg.proc(
                    ?,
                    ?
                )
            }
        "})
        .unwrap();
        assert_eq!(call.name, "pkg.proc");
        assert_eq!(call.placeholders, 2);
        let call = parse_call("call noargs").unwrap();
        assert_eq!(call.name, "noargs");
        assert_eq!(call.placeholders, 0);
    }

    #[test]
    fn function() {
        let call = parse_call("{? = call pkg.fn(?,?,?)}").unwrap();
        assert_eq!(call.kind, RoutineKind::Function);
        assert_eq!(call.name, "pkg.fn");
        assert_eq!(call.placeholders, 4);
        let call = parse_call("{?=call pkg.fn()}").unwrap();
        assert_eq!(call.placeholders, 1);
    }

    #[test]
    fn invalid() {
        assert!(parse_call("").is_err());
        assert!(parse_call("{call}").is_err());
        assert!(parse_call("{callpkg.proc()}").is_err());
        assert!(parse_call("{call pkg.proc(?,)}").is_err());
        assert!(parse_call("{call pkg.proc(?}").is_err());
        assert!(parse_call("{call pkg.proc(?)").is_err());
        assert!(parse_call("{? call pkg.fn()}").is_err());
        assert!(parse_call("{call pkg.proc()} trailing").is_err());
        assert!(parse_call("select 1").is_err());
    }
}
