use clap::Subcommand;

use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List ambient tracks
    Ambient,
    /// List reciters
    Reciters {
        /// Case-insensitive filter on the display name
        #[arg(long)]
        search: Option<String>,
    },
    /// List recitation tracks in catalog order
    Tracks {
        /// Case-insensitive filter on the display name
        #[arg(long)]
        search: Option<String>,
    },
}

pub fn run(action: CatalogAction) -> CliResult {
    let ctx = Context::load()?;
    let catalog = &ctx.catalog;

    match action {
        CatalogAction::Ambient => {
            for track in &catalog.ambient {
                println!("{:<12} {}", track.id, track.display_name);
            }
        }
        CatalogAction::Reciters { search } => {
            let query = search.unwrap_or_default();
            for reciter in catalog.search_reciters(&query) {
                println!("{:<12} {}", reciter.id, reciter.display_name);
            }
        }
        CatalogAction::Tracks { search } => {
            let query = search.unwrap_or_default();
            for track in catalog.search_recitation_tracks(&query) {
                println!("{:<12} {}", track.id, track.display_name);
            }
        }
    }
    Ok(())
}
