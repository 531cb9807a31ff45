use clap::Parser;
use colored::Colorize;
use haggle::domain::preference::LinearPreferences;
use haggle::domain::preference::Preferences;
use haggle::session::action::Action;
use haggle::session::config::AgentLabel;
use haggle::session::config::SessionConfig;
use haggle::session::engine::Session;

/// pit two engines with mirrored preferences against each other over a
/// synthetic three-issue estate and print the per-turn trace plus a
/// JSON outcome report.
#[derive(Parser, Debug)]
#[command(name = "haggle", about = "bilateral negotiation demo")]
struct Args {
    /// hard turn deadline shared by both sides.
    #[arg(long, default_value_t = 60)]
    turns: usize,
    /// fixed seed for bit-identical replays.
    #[arg(long)]
    seed: Option<u64>,
    /// discount factor applied to both sides; 1 means delay is free.
    #[arg(long, default_value_t = 1.0)]
    discount: f64,
    /// log at debug instead of info.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging(args.verbose);
    let mut a = session(AgentLabel::A, &args, 0);
    let mut b = session(AgentLabel::B, &args, 1);

    a.advance(0.);
    let mut action = a.open();
    let mut standing = bid_of(&action).cloned();
    trace(&a, 0, &action);

    let mut closed = None;
    for turn in 1..=args.turns {
        let time = turn as f64 / args.turns as f64;
        let (speaker, listener) = match turn % 2 {
            1 => (&mut b, &mut a),
            _ => (&mut a, &mut b),
        };
        speaker.advance(time);
        let next = match speaker.respond(&action) {
            Some(next) => next,
            None => break,
        };
        trace(speaker, turn, &next);
        match &next {
            Action::Offer(bid) => standing = Some(bid.clone()),
            Action::Accept | Action::EndNegotiation => {
                listener.advance(time);
                listener.respond(&next);
                closed = Some((next.clone(), turn));
            }
        }
        action = next;
        if closed.is_some() {
            break;
        }
    }

    report(&a, &b, standing, closed, args.turns)
}

fn session(label: AgentLabel, args: &Args, salt: u64) -> Session<LinearPreferences> {
    let preferences = LinearPreferences::scored(label).with_discount(args.discount);
    let mut config = SessionConfig::default().with_label(label);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed + salt);
    }
    Session::new(preferences, config)
}

fn bid_of(action: &Action) -> Option<&haggle::domain::bid::Bid> {
    match action {
        Action::Offer(bid) => Some(bid),
        _ => None,
    }
}

fn trace(speaker: &Session<LinearPreferences>, turn: usize, action: &Action) {
    let label = match speaker.label() {
        AgentLabel::A => "A".cyan().bold(),
        AgentLabel::B => "B".magenta().bold(),
    };
    let feeling = speaker
        .emotion()
        .map(|e| format!("{}", e).dimmed().to_string())
        .unwrap_or_default();
    match action {
        Action::Offer(_) => println!("{:>3} {} {} {}", turn, label, action, feeling),
        Action::Accept => println!("{:>3} {} {} {}", turn, label, format!("{}", action).green(), feeling),
        Action::EndNegotiation => println!("{:>3} {} {} {}", turn, label, format!("{}", action).red(), feeling),
    }
}

fn report(
    a: &Session<LinearPreferences>,
    b: &Session<LinearPreferences>,
    standing: Option<haggle::domain::bid::Bid>,
    closed: Option<(Action, usize)>,
    turns: usize,
) -> anyhow::Result<()> {
    let (outcome, turn) = match &closed {
        Some((action, turn)) => (format!("{}", action), *turn),
        None => ("DEADLINE".to_string(), turns),
    };
    let agreed = matches!(closed, Some((Action::Accept, _)));
    let report = serde_json::json!({
        "outcome": outcome,
        "turn": turn,
        "agreement": standing.as_ref().filter(|_| agreed).map(|bid| format!("{}", bid)),
        "utilities": standing.as_ref().filter(|_| agreed).map(|bid| serde_json::json!({
            "a": a.preferences().utility(bid),
            "b": b.preferences().utility(bid),
        })),
        "emotions": {
            "a": a.emotion().map(|e| format!("{}", e)),
            "b": b.emotion().map(|e| format!("{}", e)),
        },
        "entropy": {
            "a": a.entropies().last(),
            "b": b.entropies().last(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn logging(verbose: bool) {
    let level = match verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
