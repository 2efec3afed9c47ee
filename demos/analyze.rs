use std::io::{self, BufRead, Write};

use anyhow::Result;
use emotion_detection::{Emotion, InferenceContext, InferenceContextBuilder, Prediction, Session};
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 30;

fn print_prediction(context: &InferenceContext, prediction: &Prediction) {
    let badge = match prediction.emotion() {
        Some(emotion) => format!("{} {}", emotion.emoji(), emotion.as_str().to_uppercase()),
        None => prediction.label.to_uppercase(),
    };
    println!("\n=== Emotion ===");
    println!("{badge}");
    println!("Confidence: {:.2}", prediction.confidence);

    if prediction.is_ambiguous() {
        println!("⚠️  Ambiguous sentence detected");
    }

    println!("\n--- Distribution ---");
    for (label, score) in prediction.scores(context.labels()) {
        let filled = (score * BAR_WIDTH as f32).round() as usize;
        println!(
            "{label:>10} {:<width$} {score:.3}",
            "█".repeat(filled),
            width = BAR_WIDTH
        );
    }
}

fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("No predictions yet.");
        return;
    }
    println!("\n=== Prediction History ===");
    for (i, record) in session.history().iter().enumerate() {
        println!(
            "{:>3}. {:<10} {:.2}  {}",
            i + 1,
            record.label,
            record.confidence,
            record.text
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = std::env::args().nth(1).unwrap_or_else(|| "artifacts".to_string());

    println!("Loading emotion model from {dir}...");
    let context = match InferenceContextBuilder::from_dir(&dir).build() {
        Ok(context) => context,
        Err(e) => {
            // Without a model there is nothing to serve.
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let known: Vec<String> = Emotion::ALL
        .iter()
        .map(|e| format!("{} {}", e.emoji(), e))
        .collect();
    println!("Supported emotions: {}", known.join("  "));
    println!("Type a sentence and press enter. `:history` shows past predictions, `:quit` exits.");

    let mut session = Session::new();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            ":quit" | ":q" => break,
            ":history" => print_history(&session),
            text => match session.analyze(&context, text)? {
                Some(prediction) => print_prediction(&context, &prediction),
                None => println!("Please enter some text."),
            },
        }
    }

    print_history(&session);
    Ok(())
}
