use crate::catalog::Candidate;
use crate::search::ScoredResult;
use serde::Serialize;

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Cli,
    Json,
    Markdown,
    Csv,
    Ids,
}

/// Flattened, serializable view of a ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub score: f64,
    #[serde(rename = "match")]
    pub match_kind: String,
}

impl ResultRow {
    pub fn from_results(results: &[ScoredResult<'_, Candidate>]) -> Vec<Self> {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| Self {
                rank: i + 1,
                id: r.item.id.clone(),
                name: r.item.name.clone(),
                description: r.item.description.clone(),
                kind: r.item.kind.to_string(),
                score: r.score,
                match_kind: r.match_kind.as_str().to_string(),
            })
            .collect()
    }
}

impl Format {
    /// Create format from string
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "md" | "markdown" => Self::Markdown,
            "csv" => Self::Csv,
            "ids" | "id" => Self::Ids,
            _ => Self::Cli,
        }
    }

    /// Render search results, at most `limit` of them
    pub fn render_search_results(
        &self,
        query: &str,
        results: &[ScoredResult<'_, Candidate>],
        limit: usize,
    ) -> Result<String, anyhow::Error> {
        let limited = &results[..std::cmp::min(results.len(), limit)];
        let rows = ResultRow::from_results(limited);

        match self {
            Self::Cli => Ok(render_cli(&rows)),
            Self::Json => render_json(query, &rows),
            Self::Markdown => Ok(render_markdown(query, &rows)),
            Self::Csv => Ok(render_csv(&rows)),
            Self::Ids => Ok(render_ids(&rows)),
        }
    }

    /// Format search results to stdout
    pub fn format_search_results(
        &self,
        query: &str,
        results: &[ScoredResult<'_, Candidate>],
        limit: usize,
    ) -> Result<(), anyhow::Error> {
        print!("{}", self.render_search_results(query, results, limit)?);
        Ok(())
    }

    /// Render catalog entries in catalog order
    pub fn render_items(&self, items: &[&Candidate]) -> Result<String, anyhow::Error> {
        let mut out = String::new();
        match self {
            Self::Json => {
                out.push_str(&serde_json::to_string_pretty(items)?);
                out.push('\n');
            }
            Self::Csv => {
                out.push_str("id,kind,name,description\n");
                for item in items {
                    out.push_str(&format!(
                        "{},{},{},{}\n",
                        escape_csv(&item.id),
                        item.kind,
                        escape_csv(&item.name),
                        escape_csv(&item.description)
                    ));
                }
            }
            Self::Ids => {
                for item in items {
                    out.push_str(&item.id);
                    out.push('\n');
                }
            }
            Self::Markdown => {
                out.push_str("# Catalog\n\n");
                for item in items {
                    out.push_str(&format!("- **{}** ({}): {}\n", item.name, item.kind, item.description));
                }
            }
            Self::Cli => {
                out.push_str(&format!("{} items:\n", items.len()));
                out.push_str(&format!("{:<12} {:<30} {}\n", "Kind", "Name", "ID"));
                out.push_str(&format!("{}\n", "-".repeat(80)));
                for item in items {
                    out.push_str(&format!("{:<12} {:<30} {}\n", item.kind.as_str(), item.name, item.id));
                }
            }
        }
        Ok(out)
    }
}

fn render_cli(rows: &[ResultRow]) -> String {
    let mut out = format!("Found {} results:\n", rows.len());
    out.push_str(&format!("{:<4} {:<8} {:<14} {:<30} {}\n", "#", "Score", "Match", "Name", "ID"));
    out.push_str(&format!("{}\n", "-".repeat(100)));

    for row in rows {
        out.push_str(&format!(
            "{:<4} {:<8.4} {:<14} {:<30} {}\n",
            row.rank, row.score, row.match_kind, row.name, row.id
        ));
    }
    out
}

fn render_json(query: &str, rows: &[ResultRow]) -> Result<String, anyhow::Error> {
    #[derive(Serialize)]
    struct JsonResults<'r> {
        query: &'r str,
        total: usize,
        results: &'r [ResultRow],
    }

    let output = JsonResults {
        query,
        total: rows.len(),
        results: rows,
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

fn render_markdown(query: &str, rows: &[ResultRow]) -> String {
    let mut out = String::from("# Search Results\n\n");
    out.push_str(&format!("Query: `{}`, {} results\n\n", query, rows.len()));

    for row in rows {
        out.push_str(&format!("## {}. {}\n", row.rank, row.name));
        out.push_str(&format!("- **ID**: {}\n", row.id));
        out.push_str(&format!("- **Kind**: {}\n", row.kind));
        out.push_str(&format!("- **Score**: {:.4} ({})\n", row.score, row.match_kind));
        if !row.description.is_empty() {
            out.push_str(&format!("- **Description**: {}\n", row.description));
        }
        out.push('\n');
    }
    out
}

fn render_csv(rows: &[ResultRow]) -> String {
    let mut out = String::from("rank,score,match,kind,id,name\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.4},{},{},{},{}\n",
            row.rank,
            row.score,
            row.match_kind,
            row.kind,
            escape_csv(&row.id),
            escape_csv(&row.name)
        ));
    }
    out
}

fn render_ids(rows: &[ResultRow]) -> String {
    rows.iter().map(|row| format!("{}\n", row.id)).collect()
}

/// Quote a CSV field when it contains separators or quotes
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
