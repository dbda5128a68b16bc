//! Conditions guarding optional parts of a TRE layout

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::parameters::ParameterTable;

/// A parsed condition
///
/// | Text        | Holds when                                   |
/// |-------------|----------------------------------------------|
/// | `A AND B`   | both `A` and `B` hold                        |
/// | `FIELD!=`   | the trimmed value of `FIELD` is not empty    |
/// | `FIELD!=x`  | the value of `FIELD` is not exactly `x`      |
/// | `FIELD=x`   | the value of `FIELD` is exactly `x`          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Both conditions hold
    And(Box<Condition>, Box<Condition>),
    /// Field is not blank
    NotEmpty(String),
    /// Field differs from the literal
    NotEqual(String, String),
    /// Field equals the literal
    Equal(String, String),
}

impl Condition {
    /// Parse and evaluate `condition` in one step
    pub fn check(condition: &str, params: &ParameterTable) -> Result<bool> {
        condition.parse::<Condition>()?.evaluate(params)
    }

    /// Evaluate against the values processed so far
    pub fn evaluate(&self, params: &ParameterTable) -> Result<bool> {
        match self {
            Condition::And(lhs, rhs) => {
                let lhs = lhs.evaluate(params)?;
                let rhs = rhs.evaluate(params)?;
                Ok(lhs && rhs)
            }
            Condition::NotEmpty(field) => Ok(!params.get_text(field)?.trim_ascii().is_empty()),
            Condition::NotEqual(field, literal) => {
                Ok(params.get_text(field)? != literal.as_bytes())
            }
            Condition::Equal(field, literal) => Ok(params.get_text(field)? == literal.as_bytes()),
        }
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some((lhs, rhs)) = s.split_once(" AND ") {
            return Ok(Condition::And(Box::new(lhs.parse()?), Box::new(rhs.parse()?)));
        }

        let unsupported = || Error::UnsupportedCondition(s.to_owned());

        if let Some((field, literal)) = s.split_once("!=") {
            let field = field.trim();
            if field.is_empty() {
                return Err(unsupported());
            }
            return Ok(if literal.is_empty() {
                Condition::NotEmpty(field.to_owned())
            } else {
                Condition::NotEqual(field.to_owned(), literal.to_owned())
            });
        }

        match s.split_once('=') {
            Some((field, literal)) if !field.trim().is_empty() => {
                Ok(Condition::Equal(field.trim().to_owned(), literal.to_owned()))
            }
            _ => Err(unsupported()),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::condition::Condition;
    use crate::error::{Error, Result};
    use crate::parameters::ParameterTable;
    use crate::schema::FieldType;

    fn params() -> ParameterTable {
        let mut params = ParameterTable::new();
        params.set("FLAG", "Y", FieldType::String);
        params.set("MODE", "   ", FieldType::String);
        params.set("TYPE", "RGB", FieldType::String);
        params
    }

    #[test]
    fn parse_conditions() -> Result<()> {
        assert_eq!(
            "FLAG=Y".parse::<Condition>()?,
            Condition::Equal("FLAG".into(), "Y".into())
        );
        assert_eq!(
            "MODE!=".parse::<Condition>()?,
            Condition::NotEmpty("MODE".into())
        );
        assert_eq!(
            "FLAG!=N AND TYPE=RGB".parse::<Condition>()?,
            Condition::And(
                Box::new(Condition::NotEqual("FLAG".into(), "N".into())),
                Box::new(Condition::Equal("TYPE".into(), "RGB".into()))
            )
        );

        Ok(())
    }

    #[test]
    fn evaluate_conditions() -> Result<()> {
        let params = params();

        assert!(Condition::check("FLAG=Y", &params)?);
        assert!(!Condition::check("FLAG=N", &params)?);
        assert!(Condition::check("FLAG!=N", &params)?);
        assert!(!Condition::check("MODE!=", &params)?);
        assert!(Condition::check("TYPE!=", &params)?);
        assert!(Condition::check("FLAG=Y AND TYPE=RGB", &params)?);
        assert!(!Condition::check("FLAG=Y AND TYPE=MONO", &params)?);

        Ok(())
    }

    #[test]
    fn unsupported_grammar() {
        for condition in ["FLAG", "=Y", "FLAG>3", "!=Y"] {
            assert!(
                matches!(
                    condition.parse::<Condition>(),
                    Err(Error::UnsupportedCondition(_))
                ),
                "{condition} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_field() {
        assert!(matches!(
            Condition::check("NUMB=3", &params()),
            Err(Error::ParameterNotFound(_))
        ));
    }
}
