//! Navigation and window commands

use std::time::Instant;

use chrono::NaiveDate;
use recarga_core::RenderedReport;

use super::Reply;
use crate::utils::display::{render_report, report_list};
use crate::AppContext;

fn screen(report: &RenderedReport, catalog_len: usize) -> Reply {
    Reply::Show(render_report(report, catalog_len))
}

pub async fn next_report(ctx: &mut AppContext, now: Instant) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    Ok(screen(ctx.next(now).await?, len))
}

pub async fn previous_report(ctx: &mut AppContext, now: Instant) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    Ok(screen(ctx.previous(now).await?, len))
}

pub async fn goto_report(ctx: &mut AppContext, target: &str, now: Instant) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    Ok(screen(ctx.goto(target, now).await?, len))
}

pub fn list_reports(ctx: &AppContext) -> Reply {
    let current = ctx.displayed().map_or(0, |report| report.index);
    Reply::Show(report_list(ctx.session().controller().catalog(), current))
}

pub async fn set_auto_rotate(
    ctx: &mut AppContext,
    enabled: bool,
    now: Instant,
) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    match ctx.set_auto_rotate(enabled, now).await? {
        Some(report) => Ok(screen(report, len)),
        None => Ok(Reply::Show("Rotação automática desligada.".to_string())),
    }
}

pub async fn change_window(
    ctx: &mut AppContext,
    start: NaiveDate,
    end: NaiveDate,
    now: Instant,
) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    Ok(screen(ctx.set_window(start, end, now).await?, len))
}

pub async fn refresh(ctx: &mut AppContext, now: Instant) -> anyhow::Result<Reply> {
    let len = ctx.session().controller().catalog().len();
    Ok(screen(ctx.refresh(now).await?, len))
}
