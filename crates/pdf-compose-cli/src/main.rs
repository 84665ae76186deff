use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_compose::{
    CounterCommit, CounterStore, FileCounterStore, GenerateOptions, IngestOutcome, InputFile,
    LayoutConfig, MediaKind, PdfQueue, PlacementSummary, Selection, output_file_name,
    preview_placements,
};
use pdf_compose_runtime::{SessionCommand, SessionUpdate, worker_task};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "pdfc", about = "Compose images onto a single PDF page", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the inputs into the next numbered PDF
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Counter file (default: .pdf-file-counter in the output directory)
        #[arg(long)]
        counter_file: Option<PathBuf>,

        /// When the counter is advanced
        #[arg(long, default_value = "reserve", value_enum)]
        counter_commit: CounterCommitArg,

        /// Directory containing the pdfium library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },

    /// Show where each input would be placed, without writing anything
    Plan {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// List the built-in layouts
    Layouts {
        /// Save a built-in layout as JSON
        #[arg(long, num_args = 2, value_names = ["NAME", "PATH"])]
        save: Option<Vec<String>>,
    },

    /// Show or set the output counter
    Counter {
        /// Output directory the counter belongs to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Counter file (default: .pdf-file-counter in the output directory)
        #[arg(long)]
        counter_file: Option<PathBuf>,

        /// Store this value as the next number
        #[arg(long)]
        set: Option<u32>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input images or PDFs
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Built-in layout
    #[arg(long, default_value = "strip", value_enum, conflicts_with = "layout_file")]
    layout: LayoutArg,

    /// Layout loaded from a JSON file
    #[arg(long)]
    layout_file: Option<PathBuf>,

    /// File name to pick when there are more inputs than the layout holds
    #[arg(long)]
    pick: Vec<String>,

    /// Queue PDFs separately, outside the layout capacity
    #[arg(long)]
    separate_pdf_queue: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Strip,
    Stacked,
    Columns,
}

#[derive(Clone, Copy, ValueEnum)]
enum CounterCommitArg {
    Reserve,
    AfterSuccess,
}

impl From<LayoutArg> for LayoutConfig {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Strip => Self::strip(),
            LayoutArg::Stacked => Self::stacked(),
            LayoutArg::Columns => Self::columns(),
        }
    }
}

impl From<CounterCommitArg> for CounterCommit {
    fn from(arg: CounterCommitArg) -> Self {
        match arg {
            CounterCommitArg::Reserve => Self::Reserve,
            CounterCommitArg::AfterSuccess => Self::AfterSuccess,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            inputs,
            output,
            counter_file,
            counter_commit,
            pdfium_dir,
        } => {
            let config = inputs.layout_config().await?;
            let files = read_inputs(&inputs.input).await?;
            let counter = counter_store(&output, counter_file);
            let rasterizer = pdf_compose::default_rasterizer(pdfium_dir);
            let options = GenerateOptions {
                counter_commit: counter_commit.into(),
            };

            let (command_tx, command_rx) = mpsc::unbounded_channel();
            let (update_tx, mut update_rx) = mpsc::unbounded_channel();
            let worker = tokio::spawn(worker_task(
                command_rx,
                update_tx,
                config,
                counter,
                rasterizer,
                options,
            ));

            let mut session = SessionClient {
                command_tx,
                update_rx: &mut update_rx,
            };

            match session.request(SessionCommand::Ingest { files }).await? {
                SessionUpdate::PickerRequired { candidates, .. } => {
                    for name in &inputs.pick {
                        let index = candidate_index(&candidates, name)?;
                        session.request(SessionCommand::TogglePick { index }).await?;
                    }
                    if inputs.pick.is_empty() {
                        bail!(too_many_inputs(&candidates));
                    }
                    session.request(SessionCommand::ConfirmPick).await?;
                }
                _ => {
                    if !inputs.pick.is_empty() {
                        log::warn!("All inputs fit the layout; ignoring --pick");
                    }
                }
            }

            let generated = session
                .request(SessionCommand::Generate {
                    output_dir: Some(output),
                })
                .await?;
            session.command_tx.send(SessionCommand::Shutdown)?;
            worker.await?;

            if let SessionUpdate::Generated { pdf, path } = generated {
                print_placements(&pdf.placements);
                if pdf.placeholder_count() > 0 {
                    println!(
                        "  {} PDF(s) could not be rendered; placeholders used",
                        pdf.placeholder_count()
                    );
                }
                if let Some(path) = path {
                    println!("Generated {} image(s) → {}", pdf.placements.len(), path.display());
                }
            }
        }

        Commands::Plan { inputs } => {
            let config = inputs.layout_config().await?;
            let files = read_inputs(&inputs.input).await?;

            let mut selection = Selection::for_layout(&config);
            if let IngestOutcome::PickerRequired { .. } = selection.ingest(files)? {
                let candidates: Vec<String> =
                    selection.candidates().iter().map(|f| f.name.clone()).collect();
                if inputs.pick.is_empty() {
                    bail!(too_many_inputs(&candidates));
                }
                for name in &inputs.pick {
                    let index = candidate_index(&candidates, name)?;
                    selection.toggle_candidate(index)?;
                }
                selection.confirm_pick()?;
            }

            println!("Layout: {} ({})", config.display_name, config.name);
            let (width, height) = config.page_dimensions_mm();
            println!("  Page: {:.1} x {:.1} mm", width, height);
            print_placements(&preview_placements(&selection, &config));
        }

        Commands::Layouts { save } => {
            if let Some(args) = save {
                let [name, path] = args.as_slice() else {
                    bail!("--save takes a layout name and a path");
                };
                let config = LayoutConfig::preset(name)
                    .ok_or_else(|| anyhow!("Unknown layout '{}'", name))?;
                config.save(path).await?;
                println!("Saved layout '{}' → {}", name, path);
                return Ok(());
            }

            println!("Available layouts:");
            for preset in LayoutConfig::presets() {
                let queue = match preset.pdf_queue {
                    PdfQueue::Shared => "",
                    PdfQueue::Separate => ", PDFs queued separately",
                };
                println!(
                    "  {:<10} {} ({} image(s){})",
                    preset.name, preset.display_name, preset.capacity, queue
                );
            }
        }

        Commands::Counter {
            output,
            counter_file,
            set,
        } => {
            let counter = counter_store(&output, counter_file);
            if let Some(value) = set {
                if value == 0 {
                    bail!("The counter starts at 1");
                }
                counter.write(value).await?;
            }
            let value = counter.read().await;
            println!("Counter: {} ({})", value, counter.path().display());
            println!("  Next file: {}", output_file_name(value));
        }
    }

    Ok(())
}

impl InputArgs {
    async fn layout_config(&self) -> Result<LayoutConfig> {
        let mut config = match &self.layout_file {
            Some(path) => LayoutConfig::load(path)
                .await
                .with_context(|| format!("Failed to load layout {}", path.display()))?,
            None => self.layout.into(),
        };
        if self.separate_pdf_queue {
            config.pdf_queue = PdfQueue::Separate;
        }
        Ok(config)
    }
}

/// Sends commands to the session worker and waits for its answer
struct SessionClient<'a> {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    update_rx: &'a mut mpsc::UnboundedReceiver<SessionUpdate>,
}

impl SessionClient<'_> {
    async fn request(&mut self, cmd: SessionCommand) -> Result<SessionUpdate> {
        self.command_tx.send(cmd)?;
        match self.update_rx.recv().await {
            Some(SessionUpdate::Error { message }) => Err(anyhow!(message)),
            Some(update) => Ok(update),
            None => bail!("Session worker stopped"),
        }
    }
}

/// Read input files, skipping anything that is neither an image nor a PDF
async fn read_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaKind::media_type_for_extension);
        let Some(media_type) = media_type else {
            log::warn!("Skipping unsupported file {}", path.display());
            continue;
        };

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(file) = InputFile::from_media_type(name, bytes, media_type) {
            files.push(file);
        }
    }
    Ok(files)
}

fn counter_store(output: &Path, counter_file: Option<PathBuf>) -> FileCounterStore {
    match counter_file {
        Some(path) => FileCounterStore::new(path),
        None => FileCounterStore::in_dir(output),
    }
}

fn candidate_index(candidates: &[String], name: &str) -> Result<usize> {
    candidates
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| anyhow!("--pick {}: not among the inputs", name))
}

fn too_many_inputs(candidates: &[String]) -> String {
    format!(
        "More inputs than the layout holds; choose with --pick from: {}",
        candidates.join(", ")
    )
}

fn print_placements(placements: &[PlacementSummary]) {
    for placement in placements {
        let rect = placement.slot.rect;
        println!(
            "  [{}] {} at ({:.2}, {:.2}) mm, {:.2} x {:.2} mm{}",
            placement.slot.slot_index,
            placement.source_name,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            if placement.slot.is_rotated() {
                ", rotated 180°"
            } else {
                ""
            }
        );
    }
}
