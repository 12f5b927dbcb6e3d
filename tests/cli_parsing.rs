use clap::Parser;
use std::path::PathBuf;

use teaching_assistant::cli::commands::course::CourseCommands;
use teaching_assistant::cli::commands::resources::ResourcesCommands;
use teaching_assistant::cli::{Cli, Commands};
use teaching_assistant::RetrievalStrategy;

#[test]
fn test_parse_ask_with_strategy() {
    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "ask",
        "Deep Learning",
        "What is a CNN?",
        "--strategy",
        "vector",
    ])
    .unwrap();

    match cli.command {
        Commands::Ask(args) => {
            assert_eq!(args.course, "Deep Learning");
            assert_eq!(args.question, "What is a CNN?");
            assert_eq!(args.strategy, Some(RetrievalStrategy::Vector));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_ask_rejects_unknown_strategy() {
    let result = Cli::try_parse_from(["teaching-assistant", "ask", "ML", "q", "--strategy", "magic"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "course",
        "list",
        "--json",
        "--config",
        "custom.yaml",
        "-v",
    ])
    .unwrap();

    assert!(cli.json);
    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    assert!(matches!(
        cli.command,
        Commands::Course(args) if matches!(args.command, CourseCommands::List)
    ));
}

#[test]
fn test_parse_course_add_topics() {
    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "course",
        "add",
        "Physics",
        "--topics",
        "Optics\nMechanics",
    ])
    .unwrap();

    match cli.command {
        Commands::Course(args) => match args.command {
            CourseCommands::Add {
                name,
                topics,
                topics_file,
            } => {
                assert_eq!(name, "Physics");
                assert_eq!(topics.as_deref(), Some("Optics\nMechanics"));
                assert!(topics_file.is_none());
            }
            _ => panic!("Wrong course command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_course_add_topics_conflict_with_file() {
    let result = Cli::try_parse_from([
        "teaching-assistant",
        "course",
        "add",
        "Physics",
        "--topics",
        "Optics",
        "--topics-file",
        "topics.txt",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_course_lesson_requires_content_or_file() {
    let result = Cli::try_parse_from(["teaching-assistant", "course", "lesson", "Physics", "Optics"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "course",
        "lesson",
        "Physics",
        "Optics",
        "--file",
        "optics.pdf",
    ])
    .unwrap();
    match cli.command {
        Commands::Course(args) => match args.command {
            CourseCommands::Lesson { file, content, .. } => {
                assert_eq!(file, Some(PathBuf::from("optics.pdf")));
                assert!(content.is_none());
            }
            _ => panic!("Wrong course command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_history_and_serve() {
    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "history",
        "--course",
        "Deep Learning",
        "--limit",
        "5",
    ])
    .unwrap();
    match cli.command {
        Commands::History(args) => {
            assert_eq!(args.course.as_deref(), Some("Deep Learning"));
            assert_eq!(args.limit, Some(5));
            assert!(!args.clear);
        }
        _ => panic!("Wrong top-level command"),
    }

    let cli = Cli::try_parse_from(["teaching-assistant", "serve", "--port", "9000"]).unwrap();
    match cli.command {
        Commands::Serve(args) => {
            assert_eq!(args.port, Some(9000));
            assert!(args.host.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_resources_upload() {
    let cli = Cli::try_parse_from(["teaching-assistant", "resources", "upload", "notes.pdf"]).unwrap();
    match cli.command {
        Commands::Resources(args) => {
            assert!(matches!(
                args.command,
                ResourcesCommands::Upload { file } if file == PathBuf::from("notes.pdf")
            ));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_init_defaults() {
    let cli = Cli::try_parse_from(["teaching-assistant", "init"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(!args.force);
            assert!(!args.no_seed);
            assert_eq!(args.path, PathBuf::from("."));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_download_commands() {
    let cli = Cli::try_parse_from([
        "teaching-assistant",
        "course",
        "lesson-show",
        "Physics",
        "1",
        "--output",
        "lessons",
    ])
    .unwrap();
    match cli.command {
        Commands::Course(args) => match args.command {
            CourseCommands::LessonShow { course, index, output } => {
                assert_eq!(course, "Physics");
                assert_eq!(index, 1);
                assert_eq!(output, Some(PathBuf::from("lessons")));
            }
            _ => panic!("Wrong course command"),
        },
        _ => panic!("Wrong top-level command"),
    }

    let result = Cli::try_parse_from(["teaching-assistant", "course", "lesson-show", "Physics", "first"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from(["teaching-assistant", "resources", "get", "slides.pdf", "-o", "out.pdf"]).unwrap();
    match cli.command {
        Commands::Resources(args) => {
            assert!(matches!(
                args.command,
                ResourcesCommands::Get { filename, output }
                    if filename == "slides.pdf" && output == Some(PathBuf::from("out.pdf"))
            ));
        }
        _ => panic!("Wrong top-level command"),
    }
}
