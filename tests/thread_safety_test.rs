mod common;

use common::*;
use octofhir_hl7v2_vs::*;
use std::sync::Arc;
use std::thread;

fn messages(count: usize) -> Vec<Element> {
    (0..count)
        .map(|i| {
            let value = if i % 2 == 0 { "M" } else { "X" };
            segment(
                &format!("PID[{i}]"),
                vec![
                    bound_field(&format!("PID[{i}]-8"), 8, value, "HL70001", Usage::R),
                    bound_field(&format!("PID[{i}]-9"), 9, "Q", "HL70001", Usage::R),
                ],
            )
        })
        .collect()
}

#[test]
fn test_components_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Validator>();
    assert_send_sync::<ConfigurableDetections>();
    assert_send_sync::<InMemoryValueSetLibrary>();
    assert_send_sync::<EmptyValueSetLibrary>();
    assert_send_sync::<Element>();
}

#[test]
fn test_multithreaded_usage() {
    let validator = Arc::new(validator());
    let library = Arc::new(create_test_library());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = Arc::clone(&validator);
            let library = Arc::clone(&library);
            thread::spawn(move || {
                let value = if i % 2 == 0 { "M" } else { "X" };
                let message = bound_field("PID-8", 8, value, "HL70001", Usage::R);
                validator.check_message(&message, library.as_ref()).len()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 { 0 } else { 1 };
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let validator = Validator::with_options(
        detections(),
        ValidatorOptions::default().with_max_concurrent_validations(3),
    );
    let library: Arc<dyn ValueSetLibrary> = Arc::new(create_test_library());
    let batch = messages(20);

    let sequential: Vec<Vec<Entry>> = batch
        .iter()
        .map(|message| validator.check_message(message, library.as_ref()))
        .collect();
    let concurrent = validator.validate_batch(batch, library).await.unwrap();

    assert_eq!(concurrent, sequential);
    for (i, entries) in concurrent.iter().enumerate() {
        let expected = if i % 2 == 0 { 1 } else { 2 };
        assert_eq!(entries.len(), expected);
        assert!(entries[0].path.starts_with(&format!("PID[{i}]-")));
    }
}

#[tokio::test]
async fn test_empty_batch() {
    let library: Arc<dyn ValueSetLibrary> = Arc::new(EmptyValueSetLibrary);
    let results = validator().validate_batch(Vec::new(), library).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_library_updates_visible_to_clones() {
    let library = create_test_library();
    let shared: Arc<dyn ValueSetLibrary> = Arc::new(library.clone());

    library.insert(
        ValueSet::new("HL70002").with_code(Code::new("S", "HL70002", CodeUsage::Required)),
    );

    let message = bound_field("PID-16", 16, "S", "HL70002", Usage::R);
    let results = validator().validate_batch(vec![message], shared).await.unwrap();
    assert!(results[0].is_empty());
}
