use std::io::BufWriter;
use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use quizblast_client::app::{App, RunSummary, WanderPilot};
use quizblast_client::error::{ClientError, read_file};
use quizblast_client::hud::{JsonHud, LogHud};
use quizblast_client::questions::{ConsoleQuestions, QuestionBank, ScriptedAnswers};
use quizblast_client::renderer::Renderer;
use quizblast_client::theme::Theme;
use quizblast_core::hud::{HudSink, HudSnapshot};
use quizblast_core::question::QuestionSubsystem;
use quizblast_tanks::TankQuiz;
use quizblast_tanks::config::TankQuizConfig;
use quizblast_tanks::layout::{WorldLayout, generate_layout, load_layout};

const DEFAULT_TICKS: u64 = 1800;

#[derive(Debug, Clone, PartialEq)]
struct Options {
    ticks: u64,
    seed: Option<u64>,
    layout: Option<String>,
    questions: Option<String>,
    interactive: bool,
    render_frame: Option<String>,
    hud_json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            seed: None,
            layout: None,
            questions: None,
            interactive: false,
            render_frame: None,
            hud_json: false,
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ClientError> {
    value.parse().map_err(|_| ClientError::BadFlag {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, ClientError> {
    let mut opts = Options::default();
    for arg in args {
        if let Some(v) = arg.strip_prefix("--ticks=") {
            opts.ticks = parse_value("ticks", v)?;
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            opts.seed = Some(parse_value("seed", v)?);
        } else if let Some(v) = arg.strip_prefix("--layout=") {
            opts.layout = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--questions=") {
            opts.questions = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--render-frame=") {
            opts.render_frame = Some(v.to_string());
        } else if arg == "--interactive" {
            opts.interactive = true;
        } else if arg == "--hud-json" {
            opts.hud_json = true;
        } else {
            return Err(ClientError::UnknownFlag(arg));
        }
    }
    Ok(opts)
}

/// HUD destination picked at startup.
enum Hud {
    Log(LogHud),
    Json(JsonHud<std::io::Stdout>),
}

impl HudSink for Hud {
    fn publish(&mut self, hud: &HudSnapshot) {
        match self {
            Hud::Log(h) => h.publish(hud),
            Hud::Json(h) => h.publish(hud),
        }
    }
}

fn session<Q: QuestionSubsystem>(
    game: TankQuiz,
    questions: Q,
    hud: Hud,
    opts: &Options,
) -> Result<RunSummary, ClientError> {
    let mut app = App::new(game, questions, hud, Renderer::new(Theme::load()));
    let mut pilot = WanderPilot::new(opts.seed.unwrap_or(0));
    let start = Instant::now();
    let summary = app.run(&mut pilot, opts.ticks, || start.elapsed().as_secs_f32());

    if let Some(path) = &opts.render_frame {
        let file = std::fs::File::create(path).map_err(|source| ClientError::Io {
            path: path.clone(),
            source,
        })?;
        app.framebuffer()
            .write_ppm(BufWriter::new(file))
            .map_err(|source| ClientError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path, "Frame written");
    }
    Ok(summary)
}

fn run() -> Result<(), ClientError> {
    let opts = parse_args(std::env::args().skip(1))?;

    let layout = match (&opts.layout, opts.seed) {
        (Some(path), _) => WorldLayout::from_json(&read_file(path)?)?,
        (None, Some(seed)) => generate_layout(seed),
        (None, None) => load_layout("default"),
    };
    let game = TankQuiz::from_layout(&layout, TankQuizConfig::load())?;
    let hud = if opts.hud_json {
        Hud::Json(JsonHud::new(std::io::stdout()))
    } else {
        Hud::Log(LogHud::new())
    };

    tracing::info!(
        layout = %layout.name,
        ticks = opts.ticks,
        interactive = opts.interactive,
        "Quizblast starting"
    );

    let summary = if opts.interactive {
        let bank = match &opts.questions {
            Some(path) => QuestionBank::load_from_file(path)?,
            None => QuestionBank::builtin(),
        };
        let console = ConsoleQuestions::new(bank, std::io::stdin().lock(), std::io::stderr());
        session(game, console, hud, &opts)?
    } else {
        session(game, ScriptedAnswers::always_correct(), hud, &opts)?
    };

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        },
    }
}
