#![no_main]

use libfuzzer_sys::fuzz_target;
use throwgen::frontend::type_syntax::parse_type;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Every accepted type name must print back to a spelling that parses to the same type
        if let Ok(ty) = parse_type(s) {
            let reparsed = parse_type(&ty.to_string());
            assert_eq!(reparsed.as_ref(), Ok(&ty), "`{s}` printed as `{ty}`");
        }
    }
});
