use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use assembler::*;

fn get_test_input_file_name(relative_to_manifest: &str) -> PathBuf {
    let mut location = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    location.push(relative_to_manifest);
    if location.exists() {
        location
    } else {
        panic!(
            "Cannot find input {relative_to_manifest}: {} does not exist",
            location.display()
        );
    }
}

fn get_temp_output_file_name() -> tempfile::TempPath {
    tempfile::Builder::new()
        .suffix(".hack")
        .tempfile()
        .expect("should be able to create a temporary file")
        .into_temp_path()
}

fn files_are_identical(expected: &OsStr, got: &OsStr) -> Result<(), String> {
    fn must_read(name: &OsStr) -> Vec<u8> {
        let mut body = Vec::new();
        File::open(name)
            .and_then(|mut f| f.read_to_end(&mut body))
            .unwrap_or_else(|e| panic!("should be able to read test file {name:?}: {e}"));
        body
    }

    let expected_body = must_read(expected);
    let got_body = must_read(got);
    for (offset, (expected_byte, got_byte)) in expected_body.iter().zip(got_body.iter()).enumerate()
    {
        if expected_byte != got_byte {
            return Err(format!(
                "difference at position {offset}: expected byte {expected_byte} but got {got_byte}"
            ));
        }
    }
    if expected_body.len() != got_body.len() {
        return Err(format!(
            "wrong file length: {:?} is {} bytes but {:?} is {} bytes",
            expected,
            expected_body.len(),
            got,
            got_body.len()
        ));
    }
    Ok(())
}

fn assembler_golden_output_test(
    input_relative_path: &str,
    golden_output_relative_path: &str,
) -> Result<Assembly, String> {
    let input = get_test_input_file_name(input_relative_path);
    let golden = get_test_input_file_name(golden_output_relative_path);
    let actual_output = get_temp_output_file_name();

    match assemble_file(
        input.as_os_str(),
        &actual_output,
        OutputOptions::default(),
        &AssemblerOptions::default(),
    ) {
        Ok(assembly) => match files_are_identical(golden.as_os_str(), actual_output.as_os_str()) {
            Ok(()) => Ok(assembly),
            Err(e) => Err(format!(
                "{} and {} are not identical: {e}",
                golden.display(),
                actual_output.display(),
            )),
        },
        Err(e) => Err(format!("failed to assemble {input_relative_path}: {e}")),
    }
}

#[test]
fn golden_output_assembling_countdown_program() {
    let assembly = assembler_golden_output_test("testdata/countdown.asm", "testdata/countdown.hack")
        .expect("actual and golden outputs should have been identical");
    let symbols: Vec<(String, u16)> = assembly
        .symbols()
        .user_symbols()
        .map(|(name, address, _)| (name.to_string(), address.value()))
        .collect();
    assert_eq!(
        symbols,
        vec![
            ("total".to_string(), 16),
            ("LOOP".to_string(), 2),
            ("HALT".to_string(), 11),
        ]
    );
}

#[test]
fn golden_output_assembling_program_with_forward_references() {
    let assembly = assembler_golden_output_test("testdata/max.asm", "testdata/max.hack")
        .expect("actual and golden outputs should have been identical");
    assert!(assembly.errors().is_empty());
    assert_eq!(
        assembly.symbols().next_variable_address(),
        base::prelude::FIRST_VARIABLE
    );
}

#[test]
fn missing_input_file_is_reported() {
    let output = get_temp_output_file_name();
    let missing = get_test_input_file_name("testdata").join("no-such-file.asm");
    match assemble_file(
        missing.as_os_str(),
        &output,
        OutputOptions::default(),
        &AssemblerOptions::default(),
    ) {
        Err(AssemblerFailure::Io(IoFailed { action, .. })) => {
            assert_eq!(action, IoAction::Read);
        }
        Err(e) => panic!("unexpected failure: {e}"),
        Ok(_) => panic!("assembling a missing file should fail"),
    }
}
