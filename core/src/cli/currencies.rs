use spinners_rs::{Spinner, Spinners};

use crate::services::session::ConverterSession;

pub async fn currencies(session: &ConverterSession, search: Option<String>) -> anyhow::Result<()> {
    let mut sp = Spinner::new(Spinners::Point, "Fetching currencies");
    sp.start();
    let loaded = session.load_currencies().await;
    sp.stop();
    println!();
    loaded?;

    let mut picker = session.picker("");
    picker.toggle();
    if let Some(search) = search {
        picker.set_query(&search);
    }

    let options = picker.options();
    if options.is_empty() {
        println!("No currency matches '{}'", picker.query());
        return Ok(());
    }
    for chunk in options.chunks(10) {
        println!("{}", chunk.join("  "));
    }
    Ok(())
}
