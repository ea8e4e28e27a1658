use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_resume::{
    DocumentAssembler, FontData, GenerationOptions, GenerationUpdate, PrintPdfBuilder,
    ResumeData, Section, SinglePagePlacement, SkiaRasterizer, TemplateSurface, TemplateVariant,
    TextMetrics,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfr", about = "Render resumes to image PDFs", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit, rasterize and save a resume as PDF
    Generate {
        #[command(flatten)]
        surface: SurfaceArgs,

        /// Directory the PDF is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Document title stored in the PDF
        #[arg(long)]
        title: Option<String>,
    },

    /// Show how the content would be fitted and paginated, without rendering
    Plan {
        #[command(flatten)]
        surface: SurfaceArgs,
    },

    /// List the available templates
    Templates,
}

#[derive(Args)]
struct SurfaceArgs {
    /// Resume data (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Template to render with (see `pdfr templates`)
    #[arg(short, long, default_value = "modern", value_parser = TemplateVariant::from_key)]
    template: TemplateVariant,

    /// Generation options (JSON); command line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TrueType/OpenType font used for text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Raster scale (output pixels per surface pixel)
    #[arg(long)]
    scale: Option<f32>,

    /// Keep the aspect ratio of single-page output instead of filling the page
    #[arg(long)]
    fit_width: bool,

    /// Sections to leave out
    #[arg(long, value_enum, num_args = 1..)]
    hide: Vec<SectionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum SectionArg {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Photo,
}

impl From<PaperArg> for pdf_resume::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for pdf_resume::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Summary => Self::Summary,
            SectionArg::Experience => Self::Experience,
            SectionArg::Education => Self::Education,
            SectionArg::Skills => Self::Skills,
            SectionArg::Languages => Self::Languages,
            SectionArg::Certifications => Self::Certifications,
            SectionArg::Photo => Self::Photo,
        }
    }
}

impl SurfaceArgs {
    async fn options(&self) -> Result<GenerationOptions> {
        let mut options = match &self.config {
            Some(path) => GenerationOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GenerationOptions::default(),
        };
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(scale) = self.scale {
            options.raster_scale = scale;
        }
        if self.fit_width {
            options.single_page_placement = SinglePagePlacement::FitWidth;
        }
        options.validate()?;
        Ok(options)
    }

    async fn surface(&self, options: &GenerationOptions) -> Result<TemplateSurface> {
        let data = ResumeData::load(&self.input)
            .await
            .with_context(|| format!("Failed to read resume {}", self.input.display()))?;

        let font = match &self.font {
            Some(path) => Some(
                FontData::load(path)
                    .await
                    .with_context(|| format!("Failed to load font {}", path.display()))?,
            ),
            None => None,
        };

        let geometry = options.page_geometry()?;
        let mut surface = TemplateSurface::for_page(self.template, data, &geometry)
            .with_metrics(TextMetrics::new(font));
        for section in &self.hide {
            surface.set_section_visible((*section).into(), false);
        }
        Ok(surface)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            surface: args,
            output_dir,
            title,
        } => {
            let mut options = args.options().await?;
            if let Some(dir) = output_dir {
                tokio::fs::create_dir_all(&dir)
                    .await
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                options.output_dir = dir;
            }
            let mut surface = args.surface(&options).await?;
            let owner = surface.data().personal.full_name.clone();
            let title = title.unwrap_or_else(|| match owner.trim() {
                "" => "Resume".to_string(),
                name => format!("{} - Resume", name),
            });

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                while let Some(update) = rx.recv().await {
                    match update {
                        GenerationUpdate::Stage { state } => log::info!("Stage: {:?}", state),
                        GenerationUpdate::Busy { message } | GenerationUpdate::Error { message } => {
                            eprintln!("{}", message)
                        }
                        GenerationUpdate::Complete { .. } => {}
                    }
                }
            });

            let assembler =
                DocumentAssembler::new(SkiaRasterizer, PrintPdfBuilder::new(title), options)?
                    .with_updates(tx);
            let result = assembler.generate(&mut surface, &owner).await;
            drop(assembler);
            let _ = printer.await;

            let report = result.context("PDF generation failed")?;
            println!(
                "Generated {} page(s) ({:?} fit) → {}",
                report.page_count,
                report.fit.tier,
                report.path.display()
            );
        }

        Commands::Plan { surface: args } => {
            let options = args.options().await?;
            let mut surface = args.surface(&options).await?;
            let plan = pdf_resume::plan_generation(&mut surface, &options).await?;

            println!("Generation plan:");
            println!("  Overflow ratio: {:.2}", plan.fit.overflow_ratio);
            println!("  Compaction: {:?}", plan.fit.tier);
            if let Some(scale) = plan.fit.scale {
                println!("  Visual scale: {:.3}", scale);
            }
            println!("  Fitted height: {:.0}px", plan.fitted_height_px);
            println!("  Bitmap: {}x{}", plan.bitmap_width, plan.bitmap_height);
            println!("  Pages: {}", plan.page_count);
        }

        Commands::Templates => {
            for variant in TemplateVariant::ALL {
                println!("{}", variant);
            }
        }
    }

    Ok(())
}
