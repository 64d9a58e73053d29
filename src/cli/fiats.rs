use crate::cli::ui::{self, StyleType};
use crate::core::AssetDirectory;

pub fn run(directory: &AssetDirectory, reference_asset: &str) {
    println!("{}", ui::style_text("Fiat currencies", StyleType::Title));
    for code in directory.fiat_codes() {
        println!("  {}", code.to_uppercase());
    }
    println!(
        "{}",
        ui::style_text(
            &format!("Bridged through {reference_asset}"),
            StyleType::Subtle
        )
    );
}
