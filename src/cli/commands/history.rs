use crate::pages::{History, TypeFilter};
use crate::state::Session;

pub async fn cmd_history(
    session: &Session,
    filter: TypeFilter,
    search: Option<&str>,
) -> anyhow::Result<()> {
    let mut history = History::new(session);
    history.set_filter(filter);
    if let Some(search) = search {
        history.set_search(search);
    }

    let _ = history.load().await;
    println!("{}", history.render());
    Ok(())
}
