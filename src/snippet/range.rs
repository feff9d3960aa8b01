use crate::types::RangeError;

/// An inclusive, 1-indexed range of snippet steps selected for execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRange {
    pub start: usize,
    pub end: usize,
}

impl StepRange {
    /// Parse a user-supplied range expression over `step_count` steps
    ///
    /// Accepted forms: `""` (all steps), `"n"` (single step), `"n-m"`
    /// (inclusive range), `"n-"` (from n to the last step). Bounds are
    /// validated against `1 <= start <= end <= step_count`.
    pub fn parse(expr: &str, step_count: usize) -> Result<Self, RangeError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Ok(Self {
                start: 1,
                end: step_count,
            });
        }

        let (start, end) = match trimmed.split_once('-') {
            None => {
                let n = parse_index(trimmed, expr)?;
                (n, n)
            }
            Some((start, "")) => (parse_index(start, expr)?, step_count),
            Some((start, end)) => (parse_index(start, expr)?, parse_index(end, expr)?),
        };

        if start < 1 || end > step_count || start > end {
            return Err(RangeError::Invalid {
                expr: trimmed.to_string(),
                steps: step_count,
            });
        }

        Ok(Self { start, end })
    }
}

fn parse_index(token: &str, expr: &str) -> Result<usize, RangeError> {
    token.trim().parse::<usize>().map_err(|_| RangeError::Malformed {
        expr: expr.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression_selects_all_steps() {
        let range = StepRange::parse("", 5).unwrap();
        assert_eq!(range, StepRange { start: 1, end: 5 });
    }

    #[test]
    fn test_single_step() {
        let range = StepRange::parse("3", 5).unwrap();
        assert_eq!(range, StepRange { start: 3, end: 3 });
    }

    #[test]
    fn test_closed_range() {
        let range = StepRange::parse("2-4", 5).unwrap();
        assert_eq!(range, StepRange { start: 2, end: 4 });
    }

    #[test]
    fn test_open_ended_range() {
        let range = StepRange::parse("2-", 5).unwrap();
        assert_eq!(range, StepRange { start: 2, end: 5 });
    }

    #[test]
    fn test_full_range_as_expression() {
        let range = StepRange::parse("1-5", 5).unwrap();
        assert_eq!(range, StepRange { start: 1, end: 5 });
    }

    #[test]
    fn test_surrounding_whitespace() {
        let range = StepRange::parse(" 2-4 ", 5).unwrap();
        assert_eq!(range, StepRange { start: 2, end: 4 });
    }

    #[test]
    fn test_zero_start_is_invalid() {
        match StepRange::parse("0", 5) {
            Err(RangeError::Invalid { expr, steps }) => {
                assert_eq!(expr, "0");
                assert_eq!(steps, 5);
            }
            other => panic!("Expected Invalid error, got: {:?}", other),
        }
    }

    #[test]
    fn test_end_past_last_step_is_invalid() {
        assert!(matches!(
            StepRange::parse("2-9", 5),
            Err(RangeError::Invalid { .. })
        ));
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        assert!(matches!(
            StepRange::parse("4-2", 5),
            Err(RangeError::Invalid { .. })
        ));
    }

    #[test]
    fn test_open_range_start_past_last_step_is_invalid() {
        assert!(matches!(
            StepRange::parse("6-", 5),
            Err(RangeError::Invalid { .. })
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        for expr in ["abc", "1-x", "x-2", "-3", "1-2-3", "--", "1.5"] {
            match StepRange::parse(expr, 5) {
                Err(RangeError::Malformed { expr: reported }) => {
                    assert_eq!(reported, expr.trim());
                }
                other => panic!("Expected Malformed for {:?}, got: {:?}", expr, other),
            }
        }
    }
}
