#![no_main]

use camino::Utf8Path;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else { return };

    for d in tsfix_diagnostics::parse_all(s, Utf8Path::new("/project")) {
        assert!(d.code.bytes().all(|b| b.is_ascii_digit()));
        assert!(d.file_path.starts_with("/project") || d.file_path.is_absolute());
    }
});
