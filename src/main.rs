//! Page-View CLI (for testing purposes only)
//! The main interface is through WASM bindings. This binary paginates a
//! document described by block heights and prints the resulting pages and
//! resolved headers/footers as JSON.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use log::info;
use serde::Serialize;

use page_view::{
    BlockKind, Document, FrameList, PageInfo, PageSettings, PageView, SyntheticMeasurer, ViewMode,
    ViewStatus,
};

#[derive(Parser)]
#[command(name = "page-view", about = "Paginate a document and print its page frames")]
struct Cli {
    /// Block heights in pixels, in document order
    #[arg(long, value_delimiter = ',', required = true)]
    heights: Vec<f32>,

    /// Indices of blocks that are manual page break markers
    #[arg(long, value_delimiter = ',')]
    breaks: Vec<usize>,

    /// Page settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// View mode: scroll, continuous or page
    #[arg(long)]
    mode: Option<String>,

    /// Document title for `{{document.title}}`
    #[arg(long, default_value = "Untitled")]
    title: String,

    /// Document number for `{{document.numero}}`
    #[arg(long)]
    number: Option<String>,

    /// Date for `{{date.format("...")}}` tokens (YYYY-MM-DD), today by default
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the static mirror HTML instead of the page report
    #[arg(long)]
    html: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    status: ViewStatus,
    pages: &'a [PageInfo],
    frames: FrameList,
}

fn load_settings(cli: &Cli) -> Result<PageSettings, Box<dyn Error>> {
    let mut settings = match &cli.settings {
        Some(path) => PageSettings::from_json(&fs::read_to_string(path)?)?,
        None => PageSettings::default(),
    };
    if let Some(name) = &cli.mode {
        settings.view_mode =
            ViewMode::from_name(name).ok_or_else(|| format!("unknown view mode: {name}"))?;
    }
    Ok(settings)
}

fn build_document(cli: &Cli) -> Document {
    let mut document = Document::new(cli.title.as_str());
    document.set_number(cli.number.clone());
    for index in 0..cli.heights.len() {
        if cli.breaks.contains(&index) {
            document.push_block(BlockKind::PageBreak);
        } else {
            document.push_block(BlockKind::paragraph(&format!("Block {}", index + 1)));
        }
    }
    document
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    let document = build_document(&cli);
    let measurer = SyntheticMeasurer::new(cli.heights.clone());

    let mut view = PageView::with_document(settings, document);
    view.set_date(cli.date);
    view.attach_surface();
    view.on_resize(1600.0, 900.0);
    view.on_animation_frame(0.0, &measurer);

    info!(
        "{} block(s) on {} page(s) in {} mode",
        cli.heights.len(),
        view.total_pages(),
        view.view_mode().name()
    );

    if cli.html {
        println!("{}", view.mirror_html());
        return Ok(());
    }

    let report = Report {
        status: view.status(),
        pages: view.pages(),
        frames: view.frames(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
