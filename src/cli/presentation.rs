//! CLI presentation: text and json formatters per command.

use crate::error::CliError;
use crate::genesis::Block;
use crate::profile::Profile;
use crate::tree::walker::{Entry, Walker};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;
use std::path::Path;

pub fn format_genesis_summary(block: &Block, path: &Path, size: usize) -> String {
    format!(
        "Wrote genesis block for channel '{}' to {} ({} bytes)\nConfig digest: {}",
        block.channel_id(),
        path.display(),
        size,
        block.config_digest()
    )
}

fn entry_row(entry: &Entry) -> (&'static str, String) {
    match entry {
        Entry::Group { .. } => ("group", String::new()),
        Entry::Value { size, .. } => ("value", format!("{} bytes", size)),
        Entry::Policy { .. } => ("policy", String::new()),
    }
}

pub fn format_inspect_text(block: &Block) -> String {
    let mut out = format!(
        "Channel:       {}\nBlock number:  {}\nData hash:     {}\nConfig digest: {}\n",
        block.channel_id(),
        block.header.number,
        hex::encode(block.header.data_hash),
        block.config_digest()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Location", "Kind", "Detail"]);
    for entry in Walker::new(block.config()).walk() {
        let (kind, detail) = entry_row(&entry);
        table.add_row(vec![entry.location(), kind.to_string(), detail]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_inspect_json(block: &Block) -> Result<String, CliError> {
    let entries: Vec<_> = Walker::new(block.config())
        .walk()
        .iter()
        .map(|entry| {
            let (kind, _) = entry_row(entry);
            let mut item = json!({ "location": entry.location(), "kind": kind });
            if let Entry::Value { size, .. } = entry {
                item["size"] = json!(size);
            }
            item
        })
        .collect();

    let doc = json!({
        "channel_id": block.channel_id(),
        "number": block.header.number,
        "data_hash": hex::encode(block.header.data_hash),
        "config_digest": block.config_digest(),
        "entries": entries,
    });
    serde_json::to_string_pretty(&doc).map_err(|e| CliError::Encoding(e.into()))
}

pub fn format_verify_result(block: &Block) -> String {
    format!(
        "OK: genesis block for channel '{}' is consistent\nConfig digest: {}",
        block.channel_id(),
        block.config_digest()
    )
}

pub fn format_profiles_text(profiles: &[Profile]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Profile", "Consensus", "Orderer Orgs", "Consortiums"]);
    for profile in profiles {
        let (consensus, orgs) = match &profile.orderer {
            Some(orderer) => (orderer.orderer_type.clone(), orderer.organizations.join(", ")),
            None => ("-".to_string(), String::new()),
        };
        let consortiums: Vec<&str> = profile.consortiums.keys().map(String::as_str).collect();
        table.add_row(vec![
            profile.name.clone(),
            consensus,
            orgs,
            consortiums.join(", "),
        ]);
    }
    table.to_string()
}

pub fn format_profiles_json(profiles: &[Profile]) -> Result<String, CliError> {
    serde_json::to_string_pretty(profiles).map_err(|e| CliError::Encoding(e.into()))
}
