use edit_features::{
    extract_features, extract_features_json, BadWordLexicon, Edit, EditDiff, FeatureError,
    FeatureExtractor, ReferenceDistribution,
};
use serde_json::json;

#[test]
fn mixed_case_edit_ratios() {
    let result = extract_features(&Edit::new("", "HELLO hello 123!!!"));
    assert_eq!(result.float("upper_to_lower_ratio"), Some(1.0));
    let digit_ratio = result.float("digit_ratio").unwrap();
    assert!(
        (digit_ratio - 4.0 / 19.0).abs() < 1e-9,
        "digit_ratio should be 4/19, got {digit_ratio}"
    );
    assert_eq!(result.integer("size_increment"), Some(18));
}

#[test]
fn repeated_words_scenario() {
    let result = extract_features(&Edit::new("", "aaaa bbbb aaaa"));
    assert_eq!(
        result.text_set("inserted_words"),
        Some(&["aaaa".to_string(), "bbbb".to_string()][..])
    );
    let bigrams = result.counts("bigrams").unwrap();
    assert_eq!(
        bigrams,
        &[("aaaa bbbb".to_string(), 1), ("bbbb aaaa".to_string(), 1)]
    );
}

#[test]
fn single_template_counts_once() {
    let result = extract_features(&Edit::new("", "Intro {{infobox}} text"));
    assert_eq!(result.integer("num_templates"), Some(1));
}

#[test]
fn unbalanced_markup_is_never_negative() {
    let result = extract_features(&Edit::new("", "}} {{ {{ ]] [[ </ref> <ref>"));
    for name in ["num_templates", "num_internal_links", "num_categories", "num_references"] {
        assert_eq!(result.integer(name), Some(0), "{name} should be 0");
    }
}

#[test]
fn repeated_character_diversity_is_length() {
    let result = extract_features(&Edit::new("", "aaaa"));
    assert_eq!(result.float("character_diversity"), Some(4.0));
    assert_eq!(result.integer("longest_character_sequence"), Some(4));
}

#[test]
fn unchanged_text_has_no_size_change() {
    let text = "The same article text.\nSecond line.";
    let result = extract_features(&Edit::new(text, text));
    assert_eq!(result.integer("size_increment"), Some(0));
    assert_eq!(result.float("size_ratio"), Some(1.0));
    assert_eq!(result.integer("inserted_word_count"), Some(0));
    assert_eq!(result.integer("deleted_line_count"), Some(0));
    assert_eq!(result.text("concatenated_inserted_words"), Some(""));
}

#[test]
fn every_key_is_always_present() {
    let empty = extract_features(&Edit::new("", ""));
    let busy = extract_features(
        &Edit::new("old", "== New ==\n[[Category:X]] {{cite}} http://example.org")
            .with_comment("added stuff")
            .with_edit_id("991")
            .with_tags(["mobile edit"]),
    );
    let empty_keys: Vec<_> = empty.iter().map(|(name, _)| name).collect();
    let busy_keys: Vec<_> = busy.iter().map(|(name, _)| name).collect();
    assert_eq!(empty_keys, busy_keys);
    assert_eq!(empty.len(), edit_features::schema::FEATURES.len());
}

#[test]
fn extraction_is_deterministic() {
    let edit = Edit::new(
        "Paris is the capital of France.",
        "Paris is the capital of France. LOL this page is STUPID!!! {{vandal}} spam spam",
    )
    .with_comment("lol")
    .with_anonymous(true);
    let first = extract_features(&edit).to_json_line();
    let second = extract_features(&edit).to_json_line();
    assert_eq!(first, second);
}

#[test]
fn vandal_edit_signals() {
    let edit = Edit::new(
        "Paris is the capital of France.",
        "Paris is the capital of France. YOU ARE ALL STUPID idiot idiot!!!!!!!",
    )
    .with_anonymous(true);
    let result = extract_features(&edit);
    assert_eq!(result.boolean("anonymous"), Some(true));
    assert_eq!(result.integer("num_bad_words"), Some(2));
    assert_eq!(
        result.text_set("bad_words"),
        Some(&["stupid".to_string(), "idiot".to_string()][..])
    );
    assert_eq!(
        result.text("concatenated_inserted_words_case_sensitive"),
        Some("YOU ARE ALL STUPID idiot idiot!!!!!!!")
    );
    assert_eq!(result.integer("longest_character_sequence"), Some(7));
    assert_eq!(result.integer("longest_word"), Some(12));
}

#[test]
fn wiki_markup_counts() {
    let text = "#REDIRECT [[Somewhere]]\n\
                == History ==\n\
                Founded in 1900.<ref>{{cite book|title=Old}}</ref><ref name=\"a\"/>\n\
                === Buildings ===\n\
                [[File:Tower.jpg|thumb]] See [[Main Page]] and https://example.org/page.\n\
                [[Category:Towns]]";
    let result = extract_features(&Edit::new("", text));
    assert_eq!(result.integer("num_redirects"), Some(1));
    assert_eq!(result.integer("num_sections"), Some(2));
    assert_eq!(result.integer("num_references"), Some(2));
    assert_eq!(result.integer("num_templates"), Some(1));
    assert_eq!(result.integer("num_images"), Some(1));
    assert_eq!(result.integer("num_internal_links"), Some(3));
    assert_eq!(result.integer("num_categories"), Some(1));
    assert_eq!(result.integer("num_external_links"), Some(1));
}

#[test]
fn json_record_round_trip_through_validation() {
    let record = json!({
        "old_text": "stub",
        "new_text": "stub expanded",
        "comment": "expand",
        "anonymous": false,
        "edit_id": "123",
        "user_name": "Example",
        "is_minor": true,
    });
    let result = extract_features_json(&record).unwrap();
    assert_eq!(result.text("edit_id"), Some("123"));
    assert_eq!(result.text("user_name"), Some("Example"));
    assert_eq!(result.boolean("is_minor"), Some(true));
    assert_eq!(result.integer("comment_length"), Some(6));
    assert_eq!(result.text("concatenated_inserted_words"), Some("expanded"));
}

#[test]
fn missing_new_text_is_a_validation_error() {
    let err = extract_features_json(&json!({"old_text": "x", "comment": "c"})).unwrap_err();
    assert!(
        matches!(err, FeatureError::MissingField { field: "new_text" }),
        "unexpected error: {err}"
    );
    assert!(err.is_validation());
}

#[test]
fn batch_survives_one_malformed_edit() {
    let records = vec![
        json!({"old_text": "", "new_text": "first edit"}),
        json!({"old_text": "", "comment": "no new text"}),
        json!({"old_text": "a", "new_text": "a b"}),
    ];
    let results = FeatureExtractor::new().extract_json_batch(&records);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
    let ok: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(ok.len(), 2);
    assert_eq!(
        ok[1].text_set("inserted_words_case_sensitive"),
        Some(&["b".to_string()][..])
    );
}

#[test]
fn batch_matches_sequential_extraction() {
    let edits: Vec<Edit> = (0..32)
        .map(|i| Edit::new("base text", format!("base text plus edit number {i}")))
        .collect();
    let extractor = FeatureExtractor::new();
    let parallel = extractor.extract_batch(&edits);
    let sequential: Vec<_> = edits.iter().map(|e| extractor.extract(e)).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn supplied_diff_is_authoritative() {
    let diff = EditDiff {
        inserted_words: vec!["Alpha".to_string(), "beta".to_string(), "alpha".to_string()],
        deleted_words: vec!["gone".to_string()],
        inserted_lines: vec!["Alpha beta alpha".to_string()],
        deleted_lines: vec![],
    };
    let edit = Edit::new("gone", "Alpha beta alpha").with_diff(diff);
    let result = extract_features(&edit);
    assert_eq!(
        result.text("concatenated_inserted_words"),
        Some("alpha beta")
    );
    assert_eq!(result.integer("deleted_word_count"), Some(1));
    assert_eq!(result.integer("inserted_text_length"), Some(16));
}

#[test]
fn english_reference_changes_divergence_only() {
    let edit = Edit::new("", "the rain in spain stays mainly in the plain");
    let uniform = FeatureExtractor::new().extract(&edit);
    let english = FeatureExtractor::new()
        .with_reference(ReferenceDistribution::english())
        .extract(&edit);
    assert_ne!(
        uniform.float("character_distribution"),
        english.float("character_distribution")
    );
    assert_eq!(uniform.float("compressibility"), english.float("compressibility"));
}

#[test]
fn empty_lexicon_flags_nothing() {
    let extractor =
        FeatureExtractor::new().with_lexicon(BadWordLexicon::from_words(Vec::<&str>::new()));
    let result = extractor.extract(&Edit::new("", "spam spam spam"));
    assert_eq!(result.integer("num_bad_words"), Some(0));
    assert_eq!(result.text_set("bad_words"), Some(&[] as &[String]));
}

#[test]
fn numeric_metadata_still_yields_full_vector() {
    let record = json!({
        "old_text": "",
        "new_text": "hello",
        "edit_id": 42,
        "user_id": 9001,
        "anonymous": 1,
    });
    let result = extract_features_json(&record).unwrap();
    assert_eq!(result.len(), edit_features::schema::FEATURES.len());
    assert_eq!(result.text("edit_id"), Some("42"));
    assert_eq!(result.text("user_id"), Some("9001"));
    assert_eq!(result.boolean("anonymous"), Some(true));
    assert_eq!(result.integer("new_length"), Some(5));
}

#[test]
fn template_parameters_do_not_count_as_templates() {
    let result = extract_features(&Edit::new("", "{{{param}}}"));
    assert_eq!(result.integer("num_templates"), Some(0));
}

#[test]
fn user_id_passes_through() {
    let result = extract_features(&Edit::new("", "x").with_user_id("u-17"));
    assert_eq!(result.text("user_id"), Some("u-17"));
}
