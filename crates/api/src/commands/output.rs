//! Export and snapshot commands

use chrono::NaiveDate;

use super::Reply;
use crate::AppContext;

pub async fn export_document(ctx: &AppContext, today: NaiveDate) -> anyhow::Result<Reply> {
    let path = ctx.export(today).await?;
    Ok(Reply::Show(format!("Relatório consolidado salvo em {}", path.display())))
}

pub async fn snapshot_chart(ctx: &AppContext) -> anyhow::Result<Reply> {
    let path = ctx.snapshot().await?;
    Ok(Reply::Show(format!("Gráfico salvo em {}", path.display())))
}
