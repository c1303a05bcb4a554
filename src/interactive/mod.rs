use std::error::Error;
use std::io::{self, Write};

use comfy_table::{presets::ASCII_FULL, ContentArrangement, Table};

use crate::prom::{MetricIndex, MetricScraper, SearchHit};

/// Holds the scrape boundary and the current parsed snapshot.
///
/// The snapshot is fetched lazily on the first query and reused afterwards;
/// only an explicit [`Explorer::refresh`] replaces it.
pub struct Explorer {
    scraper: MetricScraper,
    index: Option<MetricIndex>,
}

impl Explorer {
    pub fn new(scraper: MetricScraper) -> Explorer {
        Explorer {
            scraper,
            index: None,
        }
    }

    fn index(&mut self) -> Result<&MetricIndex, Box<dyn Error>> {
        if self.index.is_none() {
            self.refresh()?;
        }
        Ok(self.index.as_ref().expect("index populated by refresh"))
    }

    pub fn refresh(&mut self) -> Result<&MetricIndex, Box<dyn Error>> {
        let body = self.scraper.fetch()?;
        let index = MetricIndex::from_exposition(&body);
        log::info!(
            "indexed {} samples from {} ({} lines dropped)",
            index.samples().len(),
            self.scraper.endpoint(),
            index.skipped().len()
        );
        self.index = Some(index);
        Ok(self.index.as_ref().expect("index just set"))
    }
}

/// Run the numbered menu loop until the user exits or stdin closes.
pub fn run(scraper: MetricScraper) -> Result<(), Box<dyn Error>> {
    let mut explorer = Explorer::new(scraper);
    loop {
        println!("\nMetrics Explorer");
        println!("1. List metric groups");
        println!("2. Search metrics");
        println!("3. Show metric details");
        println!("4. Refresh metrics");
        println!("5. Exit");

        let Some(choice) = prompt("\nEnter your choice (1-5): ")? else {
            break;
        };
        // A failed scrape only aborts the chosen action, not the loop.
        let outcome = match choice.as_str() {
            "1" => list_groups(&mut explorer),
            "2" => search(&mut explorer),
            "3" => show_details(&mut explorer),
            "4" => explorer.refresh().map(|index| {
                println!(
                    "Refreshed: {} samples, {} unparseable lines dropped",
                    index.samples().len(),
                    index.skipped().len()
                );
            }),
            "5" => break,
            _ => {
                println!("Please pick a number between 1 and 5");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            log::error!("menu action {choice} failed: {err}");
            println!("Operation failed: {err}");
        }
    }
    Ok(())
}

fn list_groups(explorer: &mut Explorer) -> Result<(), Box<dyn Error>> {
    let index = explorer.index()?;
    for (group, metrics) in index.group_by_prefix() {
        println!("\n{group}:");
        for metric in metrics {
            println!("  - {metric}");
        }
    }
    Ok(())
}

fn search(explorer: &mut Explorer) -> Result<(), Box<dyn Error>> {
    let Some(term) = prompt("Enter search term: ")? else {
        return Ok(());
    };
    let index = explorer.index()?;
    let results = index.search(&term);
    if results.is_empty() {
        println!("No results found");
        return Ok(());
    }
    println!("\nSearch results:");
    println!("{}", search_results_table(&results));
    Ok(())
}

fn show_details(explorer: &mut Explorer) -> Result<(), Box<dyn Error>> {
    println!("{}", names_hint(&explorer.index()?.metric_names()));
    let Some(name) = prompt("Enter metric name: ")? else {
        return Ok(());
    };
    let index = explorer.index()?;
    let details = index.details(&name);

    println!("\nDetails for metric: {name}");
    println!("{}", "-".repeat(50));
    if let Some(meta) = details.meta {
        println!("Type: {}", meta.metric_type);
        println!("Help: {}", meta.help);
    }

    println!("\nCurrent values:");
    if details.samples.is_empty() {
        println!("No current values found");
        return Ok(());
    }
    for sample in details.samples {
        if sample.labels.is_empty() {
            println!("Value: {}", sample.value);
        } else {
            let mut pairs: Vec<String> = sample
                .labels
                .iter()
                .map(|(key, value)| format!("{key}=\"{value}\""))
                .collect();
            pairs.sort();
            println!("Value: {} (Labels: {})", sample.value, pairs.join(", "));
        }
    }
    Ok(())
}

fn search_results_table(results: &[SearchHit<'_>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Description"]);
    for hit in results {
        table.add_row(vec![hit.name.to_string(), truncate(hit.help, 100)]);
    }
    table
}

fn names_hint(names: &[&str]) -> String {
    format!("\nKnown metrics ({}): {}", names.len(), names.join(", "))
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Returns `None` when stdin is closed.
fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
