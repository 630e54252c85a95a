use anyhow::Result;

use devolution_core::content::question_badge;
use devolution_core::AppConfig;

pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let faq = &config.event.faq;
    if json {
        println!("{}", serde_json::to_string_pretty(faq)?);
        return Ok(());
    }

    println!("{}: FAQ ({} entries)", config.event.name, faq.len());
    for (i, entry) in faq.iter().enumerate() {
        println!();
        println!("{}  {}", question_badge(i), entry.question);
        println!("    {}", entry.answer);
    }
    Ok(())
}
