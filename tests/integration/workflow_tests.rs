/*!
 * Integration tests for end-to-end conversion runs
 */

use anyhow::Result;
use std::fs;
use tokio_test;

use subtab::app_config::Config;
use subtab::app_controller::{Controller, Tool};
use subtab::{BatchOutcome, SentenceFormat, parse_srt, parse_vtt};
use crate::common;

/// Test VTT files in a folder through to tables and the manifest
#[test]
fn test_vttToTable_withFolder_shouldWriteTablesAndManifest() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "a.vtt", common::SAMPLE_VTT)?;
    common::create_test_file(&input_dir, "b.vtt", common::SAMPLE_VTT)?;
    common::create_test_file(&input_dir, "ignored.srt", common::SAMPLE_SRT)?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::new_for_test()?;
    let report = tokio_test::block_on(controller.run(
        Tool::VttToTable,
        &[input_dir],
        Some(output_dir.clone()),
        false,
    ))?;

    assert_eq!(report.outcome(), BatchOutcome::Complete);
    let table = common::read_table(&output_dir.join("a.json"))?;
    assert_eq!(table.columns(), ["Start Time", "End Time", "Text"]);
    assert_eq!(table.len(), 3);
    let manifest = common::read_table(&output_dir.join("vtt_file_names.json"))?;
    assert_eq!(manifest.column("File Names")?, vec!["a", "b"]);
    Ok(())
}

/// Test that text-only mode drops the timing columns
#[test]
fn test_srtToTable_withTextOnly_shouldWriteTextColumn() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "ep.srt", common::SAMPLE_SRT)?;

    let mut config = Config::default();
    config.parsing.text_only = true;
    let controller = Controller::with_config(config)?;
    tokio_test::block_on(controller.run(Tool::SrtToTable { single_files: false }, &[input], None, false))?;

    let table = common::read_table(&temp_dir.path().join("ep.json"))?;
    assert_eq!(table.columns(), ["Text"]);
    assert_eq!(table.column("Text")?[1], "It contains multiple entries.");
    Ok(())
}

/// Test that several SRT files in single-file mode get a folder each
#[test]
fn test_srtSingleFiles_withTwoInputs_shouldNestByStem() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let first = common::create_test_file(temp_dir.path(), "one.srt", common::SAMPLE_SRT)?;
    let second = common::create_test_file(temp_dir.path(), "two.srt", common::SAMPLE_SRT)?;
    let output_dir = temp_dir.path().join("cues");

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(controller.run(
        Tool::SrtToTable { single_files: true },
        &[first, second],
        Some(output_dir.clone()),
        false,
    ))?;

    let cue = common::read_table(&output_dir.join("two").join("3.json"))?;
    assert_eq!(cue.rows()[0], vec!["00:00:10,000", "00:00:14,000", "For testing purposes."]);
    assert!(output_dir.join("one").join("1.json").exists());
    Ok(())
}

/// Test a table to SRT and back to a table
#[test]
fn test_tableToSrt_thenSrtToTable_shouldKeepNormalizedText() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let table = common::table(&["Text"], &[&["Hello\nworld"], &["Bye"]]);
    let input = common::create_test_table(temp_dir.path(), "script.json", &table)?;

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(controller.run(Tool::TableToSrt, &[input], None, false))?;

    let srt = fs::read_to_string(temp_dir.path().join("script_converted_data.srt"))?;
    let texts: Vec<String> = parse_srt(&srt).into_iter().map(|c| c.text).collect();
    assert_eq!(texts, vec!["Hello. world.", "Bye."]);
    Ok(())
}

/// Test table to VTT with a configured column mapping
#[test]
fn test_tableToVtt_withConfiguredMapping_shouldWriteVtt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let table = common::table(&["From", "To", "Line"], &[&["00:00:01.000", "00:00:02.000", "Hi"]]);
    let input = common::create_test_table(temp_dir.path(), "clip.json", &table)?;

    let mut config = Config::default();
    config.vtt_export.start_column = "From".to_string();
    config.vtt_export.end_column = "To".to_string();
    config.vtt_export.text_column = "Line".to_string();
    let controller = Controller::with_config(config)?;
    tokio_test::block_on(controller.run(Tool::TableToVtt, &[input], None, false))?;

    let vtt = fs::read_to_string(temp_dir.path().join("clip.vtt"))?;
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert_eq!(parse_vtt(&vtt)[0].text, "Hi");
    Ok(())
}

/// Test that existing outputs are kept unless forced
#[test]
fn test_run_withExistingOutput_shouldRespectForceOverwrite() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "a.vtt", common::SAMPLE_VTT)?;
    let existing = common::create_test_file(temp_dir.path(), "a.json", "keep me")?;

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(controller.run(Tool::VttToTable, &[input.clone()], None, false))?;
    assert_eq!(fs::read_to_string(&existing)?, "keep me");

    tokio_test::block_on(controller.run(Tool::VttToTable, &[input], None, true))?;
    assert_eq!(common::read_table(&existing)?.len(), 3);
    Ok(())
}

/// Test the sentence tool and the combiner over a folder
#[test]
fn test_sentences_thenCombine_shouldProduceOneRowPerFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let rows = common::table(
        &["Start Time", "End Time", "Text"],
        &[&["1", "2", "First part"], &["2", "3", "ends here."], &["3", "4", "Dangling"]],
    );
    let input = common::create_test_table(temp_dir.path(), "talk.json", &rows)?;
    let sentence_dir = temp_dir.path().join("sentences");

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(controller.run(Tool::Sentences, &[input], Some(sentence_dir.clone()), false))?;

    let sentences = common::read_table(&sentence_dir.join("talk_sentences.json"))?;
    assert_eq!(sentences.column("Text")?, vec!["First part ends here."]);

    let combined_dir = temp_dir.path().join("combined");
    let report = tokio_test::block_on(controller.run(
        Tool::Combine,
        &[sentence_dir],
        Some(combined_dir.clone()),
        false,
    ))?;

    assert_eq!(report.outcome(), BatchOutcome::Complete);
    let combined = common::read_table(&combined_dir.join("combined_files.json"))?;
    assert_eq!(combined.rows(), [vec!["talk_sentences", "First part ends here."]]);
    Ok(())
}

/// Test that a folder with nothing to combine produces no output
#[test]
fn test_combine_withNoQualifyingTables_shouldReportEmpty() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_table(temp_dir.path(), "other.json", &common::table(&["Other"], &[&["x"]]))?;

    let controller = Controller::new_for_test()?;
    let report = tokio_test::block_on(controller.run(Tool::Combine, &[temp_dir.path().to_path_buf()], None, false))?;

    assert_eq!(report.outcome(), BatchOutcome::Empty);
    assert_eq!(report.skipped.len(), 1);
    assert!(!temp_dir.path().join("combined_files.json").exists());
    Ok(())
}

/// Test that cue ids shaped like paths cannot place files outside the output folder
#[test]
fn test_srtSingleFiles_withTraversalId_shouldStayInOutputDir() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let srt = "../../escaped\n00:00:01,000 --> 00:00:02,000\nSneaky\n\n";
    let input = common::create_test_file(temp_dir.path(), "ep.srt", srt)?;
    let output_dir = temp_dir.path().join("deep").join("out");

    let controller = Controller::new_for_test()?;
    let report = tokio_test::block_on(controller.run(
        Tool::SrtToTable { single_files: true },
        &[input],
        Some(output_dir.clone()),
        true,
    ))?;

    assert_eq!(report.outcome(), BatchOutcome::Complete);
    assert!(!temp_dir.path().join("escaped.json").exists());
    let cue = common::read_table(&output_dir.join("1.json"))?;
    assert_eq!(cue.rows()[0][2], "Sneaky");
    Ok(())
}

/// Test that repeated cue ids still write one file per cue
#[test]
fn test_srtSingleFiles_withDuplicateIds_shouldWriteEveryCue() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let srt = "1\n00:00:01,000 --> 00:00:02,000\nFirst\n\n1\n00:00:03,000 --> 00:00:04,000\nSecond\n\n";
    let input = common::create_test_file(temp_dir.path(), "ep.srt", srt)?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::new_for_test()?;
    let report = tokio_test::block_on(controller.run(
        Tool::SrtToTable { single_files: true },
        &[input],
        Some(output_dir.clone()),
        false,
    ))?;

    assert_eq!(report.outcome(), BatchOutcome::Complete);
    assert_eq!(common::read_table(&output_dir.join("1.json"))?.rows()[0][2], "First");
    assert_eq!(common::read_table(&output_dir.join("1_2.json"))?.rows()[0][2], "Second");
    Ok(())
}

/// Test that a failed write skips that item and the rest are still written
#[test]
fn test_run_withUnwritableItem_shouldSkipItAndContinue() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    fs::create_dir_all(&input_dir)?;
    common::create_test_file(&input_dir, "a.vtt", common::SAMPLE_VTT)?;
    common::create_test_file(&input_dir, "b.vtt", common::SAMPLE_VTT)?;
    let output_dir = temp_dir.path().join("out");
    // A directory where a.json should go makes that write fail
    fs::create_dir_all(output_dir.join("a.json"))?;

    let controller = Controller::new_for_test()?;
    let report = tokio_test::block_on(controller.run(
        Tool::VttToTable,
        &[input_dir],
        Some(output_dir.clone()),
        true,
    ))?;

    assert_eq!(report.outcome(), BatchOutcome::Partial);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "a.json");
    assert!(report.items.iter().all(|item| item.name != "a.json"));
    assert_eq!(common::read_table(&output_dir.join("b.json"))?.len(), 3);
    assert!(output_dir.join("vtt_file_names.json").exists());
    Ok(())
}

/// Test the sentence tool writing SubRip through the configuration
#[test]
fn test_sentences_withSrtOutput_shouldWriteSrtFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let rows = common::table(
        &["Start Time", "End Time", "Text"],
        &[
            &["00:00:01,000", "00:00:02,000", "First part"],
            &["00:00:02,000", "00:00:03,000", "ends here."],
        ],
    );
    let input = common::create_test_table(temp_dir.path(), "talk.json", &rows)?;

    let mut config = Config::default();
    config.sentences.output_format = SentenceFormat::Srt;
    let controller = Controller::with_config(config)?;
    tokio_test::block_on(controller.run(Tool::Sentences, &[input], None, false))?;

    let srt = fs::read_to_string(temp_dir.path().join("talk_sentences.srt"))?;
    let cues = parse_srt(&srt);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].id.as_deref(), Some("1"));
    assert_eq!(cues[0].timing_line(), "00:00:01,000 --> 00:00:03,000");
    assert_eq!(cues[0].text, "First part ends here.");
    Ok(())
}
