mod common;

use teaching_assistant::domain::models::StorageLayout;
use teaching_assistant::services::UploadOutcome;
use teaching_assistant::{AppContext, DomainError};

#[tokio::test]
async fn test_courses_survive_reload() {
    let dir = common::temp_dir();

    {
        let ctx = common::context(&dir);
        ctx.courses
            .add_course_from_text("Physics", "Optics\nMechanics\n")
            .await
            .unwrap();
        ctx.courses
            .add_lesson("Physics", "Optics", "Light bends when it enters glass.", None)
            .await
            .unwrap();
    }

    let ctx = common::context(&dir);
    let course = ctx.courses.get_course("Physics").await.unwrap();
    assert_eq!(course.topics, vec!["Optics", "Mechanics"]);
    assert_eq!(course.lessons.len(), 1);
    assert!(dir.path().join("courses.json").is_file());
}

#[tokio::test]
async fn test_per_course_layout_writes_one_file_per_course() {
    let dir = common::temp_dir();
    let mut config = common::test_config(&dir);
    config.storage.layout = StorageLayout::PerCourse;
    let ctx = AppContext::from_config(config).unwrap();

    ctx.courses.add_course("Physics", vec!["Optics".into()]).await.unwrap();
    ctx.courses.add_course("Chemistry", vec!["Bonds".into()]).await.unwrap();

    let files = std::fs::read_dir(dir.path().join("courses")).unwrap().count();
    assert_eq!(files, 2);
    assert_eq!(ctx.courses.list_courses().await.unwrap().len(), 2);

    ctx.courses.remove_course("Physics").await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path().join("courses")).unwrap().count(), 1);
}

#[tokio::test]
async fn test_missing_data_files_read_as_empty() {
    let dir = common::temp_dir();
    let ctx = common::context(&dir);

    assert!(ctx.courses.list_courses().await.unwrap().is_empty());
    assert!(ctx.chat.history(None, None).await.unwrap().is_empty());
    assert!(ctx.resources.materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bare_topic_lists_are_upgraded() {
    let dir = common::temp_dir();
    std::fs::write(
        dir.path().join("courses.json"),
        r#"{"Deep Learning": ["CNN", "RNN"]}"#,
    )
    .unwrap();

    let ctx = common::context(&dir);
    let course = ctx.courses.get_course("Deep Learning").await.unwrap();
    assert_eq!(course.topics, vec!["CNN", "RNN"]);
    assert!(course.lessons.is_empty());
}

#[tokio::test]
async fn test_empty_uploads_change_nothing() {
    let dir = common::temp_dir();
    let ctx = common::context(&dir);

    let outcome = ctx.courses.upload_topics("Physics", "topics.txt", b"   \n").await.unwrap();
    assert_eq!(outcome, UploadOutcome::Empty);
    assert!(matches!(
        ctx.courses.get_course("Physics").await,
        Err(DomainError::CourseNotFound(_))
    ));

    assert!(ctx.resources.upload("blank.txt", b"").await.unwrap().is_none());
    assert!(ctx.resources.materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_lesson_twice_is_unchanged() {
    let dir = common::temp_dir();
    let ctx = common::context(&dir);
    ctx.courses.add_course("Physics", vec![]).await.unwrap();

    let first = ctx
        .courses
        .upload_lesson("Physics", "Optics", "optics.txt", b"Light bends.")
        .await
        .unwrap();
    let second = ctx
        .courses
        .upload_lesson("Physics", "Optics", "optics.txt", b"Light bends.")
        .await
        .unwrap();

    assert!(matches!(first, UploadOutcome::Stored(_)));
    assert!(matches!(second, UploadOutcome::Unchanged(_)));
    assert_eq!(ctx.courses.get_course("Physics").await.unwrap().lessons.len(), 1);
}

#[tokio::test]
async fn test_seed_samples() {
    let dir = common::temp_dir();
    let ctx = common::context(&dir);

    assert_eq!(ctx.courses.seed_samples().await.unwrap(), 2);
    let names: Vec<String> = ctx
        .courses
        .list_courses()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(names.contains(&"Machine Learning Basics".to_string()));
    assert!(names.contains(&"Deep Learning".to_string()));
}
