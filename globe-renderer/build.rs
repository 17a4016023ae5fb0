use config::Config;

fn main() {
    println!("cargo::rerun-if-changed=../Settings.toml");
    println!("cargo::rerun-if-env-changed=GLOBE_DATASET_URL");

    let settings = Config::builder()
        .add_source(config::File::with_name("../Settings"))
        .add_source(config::Environment::with_prefix("GLOBE"))
        .build()
        .unwrap();

    println!(
        "cargo::rustc-env=GLOBE_dataset_url={}",
        settings.get_string("dataset_url").unwrap()
    );
}
