use std::time::Duration;

use brisadb_common::{DEFAULT_QUERY_TTL_SECS, QueryError};

use crate::Parse;
use crate::duration::parse_duration;

/// TTL usado por SET quando a consulta não informa um.
pub const DEFAULT_QUERY_TTL: Duration = Duration::from_secs(DEFAULT_QUERY_TTL_SECS);

/// Enum com todos os comandos da linguagem de consultas.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(String),
    Set {
        key: String,
        value: String,
        ttl: Duration,
    },
    Delete(String),
    Scan(String),
}

impl Command {
    /// Faz o parse de uma consulta de uma linha em um Command.
    pub fn parse(input: &str) -> Result<Command, QueryError> {
        let mut parse = Parse::new(input)?;
        let keyword = parse.next_str()?;

        let cmd = match keyword.to_uppercase().as_str() {
            "GET" => {
                parse.expect_arity("GET", 1..=1, "exatamente 1 argumento (<chave>)")?;
                Command::Get(parse.next_str()?.to_string())
            }
            "SET" => {
                parse.expect_arity("SET", 2..=3, "2 ou 3 argumentos (<chave> <valor> [ttl])")?;
                let key = parse.next_str()?.to_string();
                let value = parse.next_str()?.to_string();
                let ttl = match parse.next_optional() {
                    Some(literal) => parse_duration(literal)?,
                    None => DEFAULT_QUERY_TTL,
                };
                Command::Set { key, value, ttl }
            }
            "DELETE" => {
                parse.expect_arity("DELETE", 1..=1, "exatamente 1 argumento (<chave>)")?;
                Command::Delete(parse.next_str()?.to_string())
            }
            "SCAN" => {
                parse.expect_arity("SCAN", 1..=1, "exatamente 1 argumento (<prefixo>)")?;
                Command::Scan(parse.next_str()?.to_string())
            }
            _ => return Err(QueryError::UnknownCommand(keyword.to_string())),
        };

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get() {
        assert_eq!(
            Command::parse("GET mykey").unwrap(),
            Command::Get("mykey".into())
        );
    }

    #[test]
    fn parse_set_default_ttl() {
        assert_eq!(
            Command::parse("SET key value").unwrap(),
            Command::Set {
                key: "key".into(),
                value: "value".into(),
                ttl: Duration::from_secs(24 * 60 * 60),
            }
        );
    }

    #[test]
    fn parse_set_with_ttl() {
        match Command::parse("SET foo bar 10s").unwrap() {
            Command::Set { key, value, ttl } => {
                assert_eq!(key, "foo");
                assert_eq!(value, "bar");
                assert_eq!(ttl, Duration::from_secs(10));
            }
            other => panic!("esperado Set, veio {other:?}"),
        }
    }

    #[test]
    fn parse_set_zero_ttl() {
        match Command::parse("SET foo bar 0s").unwrap() {
            Command::Set { ttl, .. } => assert_eq!(ttl, Duration::ZERO),
            other => panic!("esperado Set, veio {other:?}"),
        }
    }

    #[test]
    fn parse_set_invalid_ttl() {
        assert!(matches!(
            Command::parse("SET foo bar soon"),
            Err(QueryError::InvalidTtl(_))
        ));
    }

    #[test]
    fn parse_delete_and_scan() {
        assert_eq!(
            Command::parse("DELETE k").unwrap(),
            Command::Delete("k".into())
        );
        assert_eq!(Command::parse("SCAN user:").unwrap(), Command::Scan("user:".into()));
    }

    #[test]
    fn case_insensitive_keywords() {
        assert_eq!(Command::parse("get Key").unwrap(), Command::Get("Key".into()));
        assert_eq!(Command::parse("sCaN a").unwrap(), Command::Scan("a".into()));
        assert!(matches!(
            Command::parse("set k v 1m").unwrap(),
            Command::Set { ttl, .. } if ttl == Duration::from_secs(60)
        ));
    }

    #[test]
    fn wrong_arity() {
        for query in ["SET foo", "SET a b c d", "GET", "GET a b", "DELETE", "SCAN a b"] {
            assert!(
                matches!(
                    Command::parse(query),
                    Err(QueryError::InvalidArgumentCount { .. })
                ),
                "{query:?}"
            );
        }
    }

    #[test]
    fn arity_message_names_expected_arity() {
        let err = Command::parse("SET foo").unwrap_err();
        assert!(err.to_string().contains("2 ou 3 argumentos"), "{err}");
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            Command::parse("FLUSH all"),
            Err(QueryError::UnknownCommand(name)) if name == "FLUSH"
        ));
    }

    #[test]
    fn empty_query() {
        assert!(matches!(Command::parse("   "), Err(QueryError::EmptyQuery)));
    }
}
