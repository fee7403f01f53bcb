use std::ops::RangeInclusive;

use brisadb_common::QueryError;

/// Cursor sobre os tokens (separados por espaço) de uma consulta.
pub struct Parse<'a> {
    parts: Vec<&'a str>,
    pos: usize,
}

impl<'a> Parse<'a> {
    /// Quebra a consulta em tokens. Consulta vazia ou com mais de uma linha
    /// é rejeitada.
    pub fn new(input: &'a str) -> Result<Parse<'a>, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(QueryError::InvalidQuery(
                "consulta deve ter uma única linha".into(),
            ));
        }
        Ok(Parse {
            parts: trimmed.split_whitespace().collect(),
            pos: 0,
        })
    }

    /// Retorna o próximo token.
    pub fn next_str(&mut self) -> Result<&'a str, QueryError> {
        let part = self
            .parts
            .get(self.pos)
            .copied()
            .ok_or_else(|| QueryError::InvalidQuery("argumentos insuficientes".into()))?;
        self.pos += 1;
        Ok(part)
    }

    /// Retorna o próximo token, se houver.
    pub fn next_optional(&mut self) -> Option<&'a str> {
        let part = self.parts.get(self.pos).copied()?;
        self.pos += 1;
        Some(part)
    }

    /// Verifica se o número de argumentos restantes está em `arity`.
    pub fn expect_arity(
        &self,
        command: &'static str,
        arity: RangeInclusive<usize>,
        expected: &'static str,
    ) -> Result<(), QueryError> {
        if arity.contains(&self.remaining()) {
            Ok(())
        } else {
            Err(QueryError::InvalidArgumentCount { command, expected })
        }
    }

    /// Retorna o número de argumentos restantes.
    pub fn remaining(&self) -> usize {
        self.parts.len() - self.pos
    }
}
