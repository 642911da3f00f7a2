use std::io::Read;
use std::path::Path;

use anyhow::Result;

use classport::{import_document, import_text, load_document, DocumentSource};
use classport::{JsonCalendarFile, ParsedClass, ReviewSession};

use super::review_loop;

pub async fn cmd_import(file: &Path, yes: bool, calendar: &Path, json: bool) -> Result<()> {
    let source = load_document(file).await?;
    let candidates = import_document(&source)?;
    finish(candidates, yes, calendar, json, true).await
}

pub async fn cmd_paste(yes: bool, calendar: &Path, json: bool) -> Result<()> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    let candidates = import_text(&text)?;
    // Stdin is spent on the pasted text, so no interactive loop here.
    finish(candidates, yes, calendar, json, false).await
}

/// Dump the text the extraction stage would hand to the parser. Extraction
/// debugging affordance: shows exactly what row reconstruction saw.
pub async fn cmd_inspect(file: &Path) -> Result<()> {
    match load_document(file).await? {
        DocumentSource::Text(text) => println!("{text}"),
        DocumentSource::Pdf(bytes) => {
            #[cfg(feature = "pdf")]
            {
                let pages = classport::extract::pdf::extract_fragments(&bytes)?;
                println!("{}", classport::extract::layout::reconstruct_document(&pages));
            }
            #[cfg(not(feature = "pdf"))]
            {
                let _ = bytes;
                anyhow::bail!("built without PDF support (enable the `pdf` feature)");
            }
        }
    }
    Ok(())
}

async fn finish(
    candidates: Vec<ParsedClass>,
    yes: bool,
    calendar: &Path,
    json: bool,
    interactive: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    let store = JsonCalendarFile::new(calendar);
    let mut session = ReviewSession::new();
    session.load(candidates);

    if yes {
        let count = session.confirm(&store).await?;
        println!("✅ Added {count} class(es) to {}", store.path().display());
        return Ok(());
    }

    if !interactive {
        review_loop::print_candidates(&session);
        println!("\nNothing committed. Re-run with --yes to add these, or use `classport import` for interactive review.");
        session.cancel();
        return Ok(());
    }

    review_loop::run(&mut session, &store).await
}
