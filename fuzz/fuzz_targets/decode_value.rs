#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::Mode;

fuzz_target!(|data: &[u8]| {
    let _ = Mode::Ber.decode(data).map(|(value, _)| {
        let _ = Mode::Ber.encode(&value.to_value());
    });

    // Anything DER accepts is already minimal, so it must encode back
    // to exactly the octets it was decoded from.
    if let Ok((value, len)) = Mode::Der.decode(data) {
        let encoded = Mode::Der.encode(&value.to_value()).unwrap();
        assert_eq!(encoded.as_slice(), &data[..len]);
    }
});
