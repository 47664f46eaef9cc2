use chrono::Local;
use color_eyre::{eyre::bail, Result};
use maestro_booking::{search_listings, BookingForm, BookingWorkflow};
use maestro_core::{
    booking::{BookingOutcome, TicketingService},
    movies::ScheduleService,
};

use crate::{
    console::{render_details, render_listings},
    context::AppContext,
};

/// `maestro search`: print the schedules table for a location and date.
pub async fn search(ctx: &AppContext, location: &str, date: Option<String>) -> Result<()> {
    let date = date.unwrap_or_else(today);
    let table = search_table(&ctx.schedules, location, &date).await?;
    println!("{table}");
    Ok(())
}

/// `maestro movie`: print one movie's details.
pub async fn movie(ctx: &AppContext, id: &str) -> Result<()> {
    let Some(details) = ctx.schedules.get_movie_details(id).await else {
        bail!("Failed to retrieve movie details.");
    };
    println!(
        "Title: {}\nDuration: {} minutes\nSynopsis: {}",
        details.title, details.duration, details.synopsis
    );
    Ok(())
}

/// `maestro book`: run the booking workflow once with the given input.
pub async fn book(ctx: &AppContext, form: BookingForm) -> Result<()> {
    let outcome = book_once(&ctx.booking, &form).await?;
    println!("{}: {}", outcome.title(), outcome.message());
    if let BookingOutcome::Completed { email_sent: false } = outcome {
        println!("(The confirmation email could not be sent.)");
    }
    Ok(())
}

async fn search_table<S: ScheduleService + ?Sized>(
    schedules: &S,
    location: &str,
    date: &str,
) -> Result<String> {
    match search_listings(schedules, location, date).await {
        Ok(listings) if listings.is_empty() => Ok("No schedules available.".to_string()),
        Ok(listings) => Ok(format_listings(&listings)),
        Err(err) => bail!("{}", err.message()),
    }
}

fn format_listings(listings: &[maestro_core::movies::ScheduleListing]) -> String {
    let mut out = render_listings(listings);
    for listing in listings {
        out.push_str("\n\n");
        out.push_str(&render_details(&listing.schedule, &listing.details));
    }
    out
}

async fn book_once<T: TicketingService + ?Sized>(
    ticketing: &T,
    form: &BookingForm,
) -> Result<BookingOutcome> {
    let outcome = BookingWorkflow::new(ticketing).book(form).await;
    if !outcome.is_completed() {
        bail!("{}: {}", outcome.title(), outcome.message());
    }
    Ok(outcome)
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
