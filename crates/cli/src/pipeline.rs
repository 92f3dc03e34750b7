//! Query pipelines given on the command line.
//!
//! Steps are separated by `|`:
//!
//! ```text
//! filter Fruit=apple | group Fruit sorted | sort Qty | reverse
//! ```

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use sheetquery_sheet::{Filter, SheetView};
use std::str::FromStr;

/// One view transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `filter COLUMN=VALUE` (raw header title)
    Filter(Filter),
    /// `where key=value[,key=value...]` (normalized keys)
    Where(Filter),
    /// `group COLUMN [sorted]`
    Group { column: String, sorted: bool },
    /// `sort COLUMN`
    Sort(String),
    /// `reverse`
    Reverse,
    /// `reset`
    Reset,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (verb, arg) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let arg = arg.trim();

        match verb.to_ascii_lowercase().as_str() {
            "filter" => {
                let (column, value) = arg
                    .split_once('=')
                    .with_context(|| format!("Invalid filter '{arg}'. Expected COLUMN=VALUE"))?;
                Ok(Step::Filter(Filter::column(column.trim(), value)))
            }
            "where" => {
                let mut fields = IndexMap::new();
                for pair in arg.split(',').filter(|p| !p.trim().is_empty()) {
                    let (key, value) = pair
                        .split_once('=')
                        .with_context(|| format!("Invalid match '{pair}'. Expected key=value"))?;
                    fields.insert(key.trim().to_string(), value.to_string());
                }
                Ok(Step::Where(Filter::Match(fields)))
            }
            "group" => {
                let (column, sorted) = match arg.strip_suffix("sorted") {
                    Some(rest) if rest.ends_with(char::is_whitespace) => (rest.trim_end(), true),
                    _ => (arg, false),
                };
                if column.is_empty() {
                    bail!("group needs a column name");
                }
                Ok(Step::Group {
                    column: column.to_string(),
                    sorted,
                })
            }
            "sort" => {
                if arg.is_empty() {
                    bail!("sort needs a column name");
                }
                Ok(Step::Sort(arg.to_string()))
            }
            "reverse" => Ok(Step::Reverse),
            "reset" => Ok(Step::Reset),
            other => bail!("Unknown step '{other}'"),
        }
    }
}

impl Step {
    /// Apply this step to a view
    pub fn apply(&self, view: &mut SheetView) {
        match self {
            Step::Filter(filter) | Step::Where(filter) => view.filter(filter.clone()),
            Step::Group { column, sorted } => view.group(column, *sorted),
            Step::Sort(column) => view.sort(column),
            Step::Reverse => view.reverse(),
            Step::Reset => view.reset(),
        };
    }
}

/// A sequence of steps applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step against the view
    pub fn apply(&self, view: &mut SheetView) {
        for step in &self.steps {
            tracing::debug!("applying {:?}", step);
            step.apply(view);
        }
    }
}

impl FromStr for Pipeline {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let steps = s
            .split('|')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<Step>)
            .collect::<Result<Vec<Step>>>()?;
        Ok(Pipeline { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetquery_sheet::SheetStore;

    #[test]
    fn test_parse_pipeline() {
        let pipeline: Pipeline = "filter Fruit=apple | group Fruit sorted | sort Qty | reverse"
            .parse()
            .unwrap();

        assert_eq!(
            pipeline.steps(),
            &[
                Step::Filter(Filter::column("Fruit", "apple")),
                Step::Group {
                    column: "Fruit".to_string(),
                    sorted: true
                },
                Step::Sort("Qty".to_string()),
                Step::Reverse,
            ]
        );
    }

    #[test]
    fn test_parse_where() {
        let step: Step = "where name=Al, age=10".parse().unwrap();

        assert_eq!(
            step,
            Step::Where(Filter::matching([("name", "Al"), ("age", "10")]))
        );
    }

    #[test]
    fn test_parse_column_with_spaces() {
        let step: Step = "group Unit Price".parse().unwrap();
        assert_eq!(
            step,
            Step::Group {
                column: "Unit Price".to_string(),
                sorted: false
            }
        );

        let step: Step = "filter Unit Price=2".parse().unwrap();
        assert_eq!(step, Step::Filter(Filter::column("Unit Price", "2")));
    }

    #[test]
    fn test_filter_keeps_value_whitespace() {
        let step: Step = "filter Name= Al".parse().unwrap();
        assert_eq!(step, Step::Filter(Filter::column("Name", " Al")));
    }

    #[test]
    fn test_parse_errors() {
        assert!("explode".parse::<Step>().is_err());
        assert!("filter Fruit".parse::<Step>().is_err());
        assert!("sort".parse::<Step>().is_err());
        assert!("group".parse::<Step>().is_err());
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline: Pipeline = "".parse().unwrap();
        assert!(pipeline.steps().is_empty());
    }

    #[test]
    fn test_apply() {
        let mut store = SheetStore::new();
        store.append_grid(
            "Sheet1",
            vec![
                vec!["Fruit".into(), "Qty".into()],
                vec!["apple".into(), "3".into()],
                vec!["banana".into(), "1".into()],
                vec!["apple".into(), "5".into()],
            ],
        );
        let pipeline: Pipeline = "filter Fruit=apple | sort Qty | reverse".parse().unwrap();

        let mut view = store.view("Sheet1");
        pipeline.apply(&mut view);

        let qty = view.map_rows(|row| row.get_key("qty").unwrap_or_default().to_string());
        assert_eq!(qty, vec!["5", "3"]);
    }
}
