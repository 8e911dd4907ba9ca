struct CryptoBackend {
    name: &'static str,
    feature: &'static str,
}

const ALL_BACKENDS: &[CryptoBackend] = &[CryptoBackend {
    name: "RustCrypto",
    feature: "crypto-rustcrypto",
}];

fn main() {
    crypto_backends_check();
}

fn crypto_backends_check() {
    let enabled = ALL_BACKENDS
        .iter()
        .filter(|backend| {
            std::env::var(format!(
                "CARGO_FEATURE_{}",
                backend.feature.to_uppercase().replace("-", "_")
            ))
            .is_ok()
        })
        .collect::<Vec<_>>();

    if enabled.is_empty() {
        // the dummy backend is compiled instead, every recipient then fails
        // with a decrypt failure
        println!(
            "cargo:warning=No cryptographic backend selected. `cose-recipient` rejects every \
             key wrap and HPKE operation until one of these features is enabled: {}",
            ALL_BACKENDS
                .iter()
                .map(|b| b.feature)
                .collect::<Vec<_>>()
                .join(", ")
        );
    } else {
        println!(
            "cargo:rustc-env=COSE_RECIPIENT_CRYPTO_BACKEND={}",
            enabled[0].name
        );
    }
}
