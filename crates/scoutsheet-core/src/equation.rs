//! Named scoring formulas and their evaluation against a team.

use std::fmt;
use std::str::FromStr;

use crate::error::ScoutError;
use crate::expr::{self, Token};
use crate::schema::Schema;
use crate::team::TeamValues;

/// A named formula such as `Total Score = auto_points + climbed_yes*5`.
///
/// The template is never modified; every evaluation substitutes into a fresh
/// copy, so one equation can score any number of teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    name: String,
    template: String,
}

/// Result of substituting a team's answers into an equation template.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// The template with every bound identifier replaced by a literal.
    pub expression: String,
    /// Coercion failures hit while substituting.
    pub diagnostics: Vec<ScoutError>,
}

/// Result of scoring one team with one equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The score; `0.0` when the expression could not be evaluated.
    pub value: f64,
    /// The substituted expression that was evaluated.
    pub expression: String,
    /// Every recoverable error encountered, in order.
    pub diagnostics: Vec<ScoutError>,
}

impl Equation {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            template: template.into().trim().to_string(),
        }
    }

    /// Parse `Name = expression`, splitting on the first `=`.
    pub fn parse(line: &str) -> Result<Self, ScoutError> {
        let (name, template) = line
            .split_once('=')
            .ok_or_else(|| ScoutError::MalformedEquation(line.trim().to_string()))?;
        Ok(Self::new(name, template))
    }

    /// The name as written in the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name in Title Case, used as the report column header.
    pub fn display_name(&self) -> String {
        format_name(&self.name)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Identifier tokens the template references, in order of appearance.
    pub fn identifiers(&self) -> Vec<&str> {
        identifier_spans(&self.template)
            .into_iter()
            .map(|(start, end)| &self.template[start..end])
            .collect()
    }

    /// Replace every identifier the schema binds with the team's value.
    ///
    /// Identifiers are whole tokens, so `score` never matches inside `score2`.
    /// Unbound identifiers are left as written.
    pub fn substitute(&self, schema: &Schema, team: &dyn TeamValues) -> Substitution {
        let mut expression = String::with_capacity(self.template.len());
        let mut diagnostics: Vec<ScoutError> = Vec::new();
        let mut last = 0;

        for (start, end) in identifier_spans(&self.template) {
            let token = &self.template[start..end];
            let Some(binding) = schema.binding(&token.to_lowercase()) else {
                continue;
            };
            let (literal, error) = binding.resolve(team);
            if let Some(error) = error {
                if !diagnostics.contains(&error) {
                    tracing::debug!(equation = %self.name, "{error}");
                    diagnostics.push(error);
                }
            }
            expression.push_str(&self.template[last..start]);
            expression.push_str(&literal);
            last = end;
        }
        expression.push_str(&self.template[last..]);

        Substitution {
            expression,
            diagnostics,
        }
    }

    /// Substitute and evaluate. Never fails: an unparseable expression scores
    /// `0.0` and the error is recorded in the diagnostics.
    pub fn evaluate(&self, schema: &Schema, team: &dyn TeamValues) -> Evaluation {
        let Substitution {
            expression,
            mut diagnostics,
        } = self.substitute(schema, team);

        let value = match expr::evaluate(&expression) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(equation = %self.name, "{e}");
                diagnostics.push(e);
                0.0
            }
        };

        Evaluation {
            value,
            expression,
            diagnostics,
        }
    }

    /// Convenience wrapper returning only the score.
    pub fn score(&self, schema: &Schema, team: &dyn TeamValues) -> f64 {
        self.evaluate(schema, team).value
    }
}

impl FromStr for Equation {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Equation::parse(s)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.template)
    }
}

/// Title-case a name word by word.
///
/// Words are split on single spaces, so runs of spaces survive as empty
/// words and the result is idempotent.
pub fn format_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Byte spans of identifier tokens: word runs that are not numeric
/// literals. Literals, including exponent tails like the `5` in `1e-5`, are
/// skipped with the same scan the evaluator uses.
fn identifier_spans(template: &str) -> Vec<(usize, usize)> {
    let bytes = template.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match expr::literal_at(bytes, i) {
            Token::Word(end) => {
                spans.push((i, end));
                i = end;
            }
            Token::Number(end) => i = end,
            Token::Other => i += 1,
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::team::TeamRecord;

    fn schema(lines: &[&str]) -> Schema {
        lines
            .iter()
            .map(|l| FieldDescriptor::parse(l).unwrap())
            .collect()
    }

    fn scouting_schema() -> Schema {
        schema(&[
            "TEXTFIELD<number> ;; Auto Points ;; auto_points",
            "SWITCH ;; Climbed,Parked ;; climbed,parked",
        ])
    }

    #[test]
    fn parse_splits_on_first_equals() {
        let eq = Equation::parse(" Total Score = a = b ").unwrap();
        assert_eq!(eq.name(), "Total Score");
        assert_eq!(eq.template(), "a = b");
    }

    #[test]
    fn parse_without_equals_is_malformed() {
        assert_eq!(
            Equation::parse("Total Score"),
            Err(ScoutError::MalformedEquation("Total Score".into()))
        );
    }

    #[test]
    fn display_name_is_title_case() {
        assert_eq!(format_name("total SCORE"), "Total Score");
        assert_eq!(format_name("auto"), "Auto");
        assert_eq!(format_name("a  b"), "A  B");
        assert_eq!(format_name(""), "");
    }

    #[test]
    fn display_name_is_idempotent() {
        for name in ["total SCORE", "x", "  leading", "mIxEd case words"] {
            let once = format_name(name);
            assert_eq!(format_name(&once), once);
        }
    }

    #[test]
    fn scores_total_with_switch_column() {
        let schema = scouting_schema();
        let eq = Equation::parse("Total Score = auto_points + climbed_yes*5").unwrap();
        let team = TeamRecord::new("254")
            .with("auto_points", "12")
            .with("climbed", "yes");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "12 + 1*5");
        assert_eq!(eval.value, 17.0);
        assert!(eval.diagnostics.is_empty());
    }

    #[test]
    fn malformed_expression_scores_zero() {
        let schema = scouting_schema();
        let eq = Equation::parse("Bad Formula = auto_points +").unwrap();
        let team = TeamRecord::new("254").with("auto_points", "12");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.value, 0.0);
        assert!(matches!(
            eval.diagnostics.as_slice(),
            [ScoutError::ExpressionSyntaxError { .. }]
        ));
    }

    #[test]
    fn non_numeric_answer_substitutes_zero() {
        let schema = scouting_schema();
        let eq = Equation::parse("Auto = auto_points * 2 + 1").unwrap();
        let team = TeamRecord::new("254").with("auto_points", "N/A");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "0 * 2 + 1");
        assert_eq!(eval.value, 1.0);
        assert_eq!(eval.diagnostics.len(), 1);
        assert_eq!(
            eval.diagnostics[0].to_string(),
            "auto_points does not have a numeric value"
        );
    }

    #[test]
    fn repeated_evaluation_uses_fresh_template() {
        let schema = scouting_schema();
        let eq = Equation::parse("Total = auto_points + climbed*10").unwrap();
        let first = TeamRecord::new("1")
            .with("auto_points", "4")
            .with("climbed", "yes");
        let second = TeamRecord::new("2")
            .with("auto_points", "7")
            .with("climbed", "no");

        assert_eq!(eq.score(&schema, &first), 14.0);
        assert_eq!(eq.score(&schema, &second), 7.0);
        assert_eq!(eq.score(&schema, &first), 14.0);
        assert_eq!(eq.template(), "auto_points + climbed*10");
    }

    #[test]
    fn keys_that_prefix_each_other_are_distinct() {
        let schema = schema(&[
            "STEPPER ;; Score ;; score",
            "STEPPER ;; Score Two ;; score2",
        ]);
        let eq = Equation::parse("Sum = score + score2 * 10").unwrap();
        let team = TeamRecord::new("1").with("score", "3").with("score2", "4");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "3 + 4 * 10");
        assert_eq!(eval.value, 43.0);
    }

    #[test]
    fn keys_inside_numeric_literals_are_untouched() {
        let schema = schema(&[
            "STEPPER ;; Exponent ;; e5",
            "STEPPER ;; Five ;; 5",
        ]);
        let eq = Equation::parse("Lit = 1e5 + 2.5 + 1e-5 + e5").unwrap();
        let team = TeamRecord::new("1").with("e5", "1").with("5", "9");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "1e5 + 2.5 + 1e-5 + 1");
    }

    #[test]
    fn key_ending_in_exponent_like_suffix() {
        let schema = schema(&[
            "STEPPER ;; Gears ;; gears2e",
            "SWITCH ;; Climbed ;; climbed",
        ]);
        let eq = Equation::parse("Net = gears2e-climbed").unwrap();
        let team = TeamRecord::new("1")
            .with("gears2e", "4")
            .with("climbed", "yes");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "4-1");
        assert_eq!(eval.value, 3.0);
        assert!(eval.diagnostics.is_empty());
        assert_eq!(eq.identifiers(), vec!["gears2e", "climbed"]);
    }

    #[test]
    fn identifiers_match_case_insensitively() {
        let schema = scouting_schema();
        let eq = Equation::parse("Auto = Auto_Points").unwrap();
        let team = TeamRecord::new("1").with("auto_points", "6");
        assert_eq!(eq.score(&schema, &team), 6.0);
    }

    #[test]
    fn slider_keys_are_left_in_place() {
        let schema = schema(&["SLIDER<0,5> ;; Defense ;; defense"]);
        let eq = Equation::parse("Defense = defense * 2").unwrap();
        let team = TeamRecord::new("1").with("defense", "3");

        let eval = eq.evaluate(&schema, &team);
        assert_eq!(eval.expression, "defense * 2");
        assert_eq!(eval.value, 0.0);
        assert_eq!(eval.diagnostics.len(), 1);
    }

    #[test]
    fn identifiers_listed_in_order() {
        let eq = Equation::parse("T = a + b_2 * 3 - (a)").unwrap();
        assert_eq!(eq.identifiers(), vec!["a", "b_2", "a"]);
    }
}
