use kgen::{
    address::{decompose, DEFAULT_ADDRESS},
    generator,
    isr::{isr_name, Emitter, EmitterConfig, Sections, Strategy},
};

fn generate(strategy: Strategy) -> String {
    let emitter = Emitter::new(EmitterConfig {
        strategy,
        ..Default::default()
    })
    .unwrap();

    let mut out = Vec::new();
    generator::write_all(DEFAULT_ADDRESS, &emitter, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Pull the vector number out of a `...(N, isrN);` registration line
fn registered_vector(line: &str) -> u16 {
    let args = line
        .split_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(");"))
        .unwrap();
    let (vector, symbol) = args.split_once(", ").unwrap();
    assert_eq!(symbol, format!("isr{}", vector));
    vector.parse().unwrap()
}

#[test]
fn test_default_output_layout() {
    let output = generate(Strategy::Standard);
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 513);
    assert_eq!(lines[0], decompose(DEFAULT_ADDRESS));
    assert_eq!(lines[0], "0-0-1ff-0-0");
    assert!(output.ends_with('\n'));
}

#[test]
fn test_registration_sequence_has_no_gaps() {
    for strategy in Strategy::ALL {
        let output = generate(strategy);
        let vectors = output
            .lines()
            .skip(1)
            .take(256)
            .map(registered_vector)
            .collect::<Vec<_>>();
        assert_eq!(vectors, (0..256).collect::<Vec<u16>>(), "{}", strategy);
    }
}

#[test]
fn test_definitions_follow_registrations() {
    for strategy in Strategy::ALL {
        let output = generate(strategy);
        for (vector, line) in output.lines().skip(257).enumerate() {
            let vector = u8::try_from(vector).unwrap();
            let symbol = format!(" {}(", isr_name(vector));
            assert!(line.contains(&symbol), "{}: {}", strategy, line);
            assert!(!line.contains("GLOBAL_IDT"));
        }
    }
}

#[test]
fn test_error_code_vectors() {
    let output = generate(Strategy::Standard);
    let error_vectors = output
        .lines()
        .filter(|line| line.starts_with("GLOBAL_IDT.kernelErrorISR("))
        .map(registered_vector)
        .collect::<Vec<_>>();
    assert_eq!(error_vectors, vec![8, 10, 11, 12, 13, 14, 17, 30]);

    let uniform = generate(Strategy::UniformRegistration);
    assert!(!uniform.contains("kernelErrorISR"));
}

#[test]
fn test_naked_stubs_push_placeholder() {
    let output = generate(Strategy::Naked);
    let placeholders = output
        .lines()
        .filter(|line| line.contains("push $0; push $"))
        .count();
    assert_eq!(placeholders, 256 - 8);
}

#[test]
fn test_output_is_byte_identical() {
    for strategy in Strategy::ALL {
        assert_eq!(generate(strategy), generate(strategy));
    }
}

#[test]
fn test_registrations_only() {
    let emitter = Emitter::new(EmitterConfig {
        sections: Sections::REGISTRATIONS,
        ..Default::default()
    })
    .unwrap();

    let mut out = Vec::new();
    emitter.emit(&mut out).unwrap();
    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 256);
    assert!(output.lines().all(|line| line.starts_with("GLOBAL_IDT.")));
}
