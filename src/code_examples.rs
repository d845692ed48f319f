use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered on the Code Examples page. Illustrative only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    Sql,
    Rust,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::JavaScript,
        Language::Sql,
        Language::Rust,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Sql => "SQL",
            Language::Rust => "Rust",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let i = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn snippet(&self) -> &'static str {
        match self {
            Language::Python => PYTHON,
            Language::JavaScript => JAVASCRIPT,
            Language::Sql => SQL,
            Language::Rust => RUST,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown language '{}'", s))
    }
}

const PYTHON: &str = r#"def add_expense(date, amount, category, description):
    # Logic to add expense to database
    pass
"#;

const JAVASCRIPT: &str = r#"function addExpense(date, amount, category, description) {
    // Logic to add expense to database
}
"#;

const SQL: &str = r#"INSERT INTO expenses (date, amount, category, description)
VALUES ('2024-10-25', 50.00, 'Food', 'Lunch');
"#;

const RUST: &str = r#"let store = Store::open("expenses.db")?;
store.append(date, 50.00, "Food", "Lunch")?;
store.close()?;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_snippet() {
        for language in Language::ALL {
            assert!(!language.snippet().is_empty());
        }
        assert!(Language::Sql.snippet().starts_with("INSERT INTO expenses"));
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("sql".parse::<Language>().unwrap(), Language::Sql);
        assert_eq!("JavaScript".parse::<Language>().unwrap(), Language::JavaScript);
        assert!("cobol".parse::<Language>().is_err());
        assert_eq!(Language::Rust.next(), Language::Python);
    }
}
