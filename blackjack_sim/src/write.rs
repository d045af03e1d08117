use crate::{SimulationError, SimulationSummary};
use clap::ValueEnum;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::sync::mpsc::Receiver;

/// How aggregated summaries are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn format_summaries(summaries: &BTreeMap<usize, SimulationSummary>) -> String {
    const WIDTH: usize = 80;
    summaries
        .iter()
        .map(|(id, summary)| {
            let header = format!("{:-^WIDTH$}\n", format!("simulation #{}", id));
            format!("{}{}{}\n", header, summary, "-".repeat(WIDTH))
        })
        .collect()
}

/// Receives `(summary, id)` pairs until every id has sent `None` (or every sender is gone),
/// merging summaries that share an id, then writes them to `writer` in id order.
pub fn write_summaries(
    receiver: Receiver<(Option<SimulationSummary>, usize)>,
    mut ids: HashSet<usize>,
    mut writer: impl Write,
    format: OutputFormat,
) -> Result<(), SimulationError> {
    let mut summaries: BTreeMap<usize, SimulationSummary> = BTreeMap::new();
    while !ids.is_empty() {
        let Ok((summary, id)) = receiver.recv() else {
            break;
        };
        match summary {
            Some(summary) => match summaries.get_mut(&id) {
                Some(total) => total.merge(summary),
                None => {
                    summaries.insert(id, summary);
                }
            },
            None => {
                ids.remove(&id);
            }
        }
    }
    if !ids.is_empty() {
        log::warn!("{} simulation(s) did not finish", ids.len());
    }

    match format {
        OutputFormat::Text => writer.write_all(format_summaries(&summaries).as_bytes())?,
        OutputFormat::Json => {
            let ordered: Vec<&SimulationSummary> = summaries.values().collect();
            serde_json::to_writer_pretty(&mut writer, &ordered)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
