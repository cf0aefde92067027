use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;

const MASK: &str = "****";

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file. Values in the file win over the
    /// process environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::EnvFile(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn all(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// Keys starting with `prefix`, sorted, paired with a value safe to log.
    pub fn redacted_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .vars
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| {
                let shown = if self.is_sensitive(key) {
                    MASK.to_string()
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect();
        pairs.sort();
        pairs
    }

    fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p.as_str()))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::EnvFile(format!(
                    "malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::EnvFile(format!(
                    "empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "uri", "credential"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty() -> EnvManager {
        EnvManager {
            vars: HashMap::new(),
            sensitive_patterns: EnvManager::default_sensitive_patterns(),
        }
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
SQL2DOC_MYSQL_HOST=db.internal
export SQL2DOC_NUM_WORKERS=8
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.all().get("SQL2DOC_MYSQL_HOST").unwrap(), "db.internal");
        assert_eq!(env.all().get("SQL2DOC_NUM_WORKERS").unwrap(), "8");
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
EMPTY=
URI=mongodb://h:27017/?w=1
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.all().get("QUOTED").unwrap(), "value with spaces");
        assert_eq!(env.all().get("SINGLE").unwrap(), "single quoted");
        assert_eq!(env.all().get("EMPTY").unwrap(), "");
        assert_eq!(env.all().get("URI").unwrap(), "mongodb://h:27017/?w=1");
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn secrets_are_masked() {
        let mut env = empty();
        env.parse_env_content(
            "SQL2DOC_MYSQL_PASSWORD=hunter2\nSQL2DOC_MONGODB_URI=mongodb://u:p@h\nSQL2DOC_MYSQL_HOST=h\nOTHER=x",
        )
        .unwrap();

        assert_eq!(
            env.redacted_with_prefix("SQL2DOC_"),
            vec![
                ("SQL2DOC_MONGODB_URI".to_string(), MASK.to_string()),
                ("SQL2DOC_MYSQL_HOST".to_string(), "h".to_string()),
                ("SQL2DOC_MYSQL_PASSWORD".to_string(), MASK.to_string()),
            ]
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SQL2DOC_BATCH_SIZE=500").unwrap();

        let mut env = empty();
        env.load_from_file(file.path()).unwrap();
        assert_eq!(env.all().get("SQL2DOC_BATCH_SIZE").unwrap(), "500");
    }
}
