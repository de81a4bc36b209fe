use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "imgseq", version)]
struct Cli {
    /// Log pipeline activity to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the node list with lengths, extents and grids.
    Info(DocArgs),
    /// Write one output frame as a PNG.
    Frame(FrameArgs),
    /// Cook every output frame and write them as numbered PNGs.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct DocArgs {
    /// Input document JSON. Sibling documents are loaded for inheritance.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory source frame ids are relative to. Defaults to the document's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: usize,

    /// Read the output of this node instead of the pipeline's final output.
    #[arg(long)]
    node: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// File name prefix.
    #[arg(long, default_value = "frame")]
    prefix: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn open_pipeline(args: &DocArgs) -> anyhow::Result<imgseq::Pipeline> {
    let doc = imgseq::SequenceDocument::load(&args.in_path)
        .with_context(|| format!("load document '{}'", args.in_path.display()))?;
    let dir = args
        .in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut docs = imgseq::DocumentSet::scan_dir(dir)
        .with_context(|| format!("scan documents in '{}'", dir.display()))?;
    let name = doc.name.clone();
    docs.insert(doc);

    let kind = match args.backend {
        BackendChoice::Cpu => imgseq::BackendKind::Cpu,
    };
    let root = args.root.clone().unwrap_or_else(|| dir.to_path_buf());
    let pipeline = imgseq::Pipeline::from_document(
        &docs,
        &name,
        &imgseq::TransformRegistry::builtin(),
        imgseq::create_backend(kind),
        Box::new(imgseq::DirectorySource::new(root)),
    )?;
    Ok(pipeline)
}

fn describe(extent: Option<imgseq::Extent>) -> String {
    extent.map_or_else(|| "unknown".to_string(), |e| e.to_string())
}

fn cmd_info(args: DocArgs) -> anyhow::Result<()> {
    let pipeline = open_pipeline(&args)?;

    let input = pipeline.input_sequence();
    println!(
        "input: {} frame(s), {}",
        input.len(),
        describe(input.extent())
    );
    for (k, node) in pipeline.nodes().iter().enumerate() {
        let seq = pipeline.output_sequence_at(k)?;
        let grid = seq.grid();
        println!(
            "{k}: {} | {} frame(s), {}, grid {}x{}",
            node.label(),
            seq.len(),
            describe(seq.extent()),
            grid.u,
            grid.v
        );
    }
    let output = pipeline.output_sequence();
    println!(
        "output: {} frame(s), {}",
        output.len(),
        describe(output.extent())
    );
    Ok(())
}

fn save_png(
    pipeline: &imgseq::Pipeline,
    frame: &imgseq::FrameRef,
    out: &Path,
) -> anyhow::Result<()> {
    let pixels = pipeline.read_frame(frame)?;
    image::DynamicImage::ImageRgba32F(pixels)
        .to_rgba8()
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut pipeline = open_pipeline(&args.doc)?;
    let stage = match args.node {
        Some(k) => pipeline.output_stage_of(k)?,
        None => pipeline.output_stage(),
    };
    let frame = pipeline.request_frame(stage, args.frame)?;
    if !frame.is_ready() {
        anyhow::bail!("frame {} could not be computed", args.frame);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    save_png(&pipeline, &frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut pipeline = open_pipeline(&args.doc)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    // Cook incrementally, one frame per call, before writing anything.
    if let imgseq::Stage::Node(k) = pipeline.output_stage() {
        let mut seed = 0;
        while let Some(done) = pipeline.request_process_one_frame(k, seed)? {
            seed = done;
        }
    }

    let stage = pipeline.output_stage();
    let len = pipeline.output_sequence().len();
    for index in 0..len {
        let frame = pipeline.request_frame(stage, index)?;
        if !frame.is_ready() {
            anyhow::bail!("frame {index} could not be computed");
        }
        let out = args
            .out_dir
            .join(format!("{}_{index:04}.png", args.prefix));
        save_png(&pipeline, &frame, &out)?;
    }

    eprintln!("wrote {len} frame(s) to {}", args.out_dir.display());
    Ok(())
}
