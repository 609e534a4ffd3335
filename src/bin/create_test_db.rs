use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use tally_rs::{Category, CategoryName, Transaction, create_category, create_transaction, initialize_db};

/// A utility for creating a test database for the Tally web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");

    let groceries = seed_category(&conn, "Groceries", "Supermarkets and food shops", "🛒", "#22c55e")?;
    let rent = seed_category(&conn, "Rent", "Rent and housing costs", "🏠", "#3b82f6")?;
    let transport = seed_category(&conn, "Transport", "Fuel, buses and trains", "🚌", "#f59e0b")?;
    let eating_out = seed_category(
        &conn,
        "Eating Out",
        "Restaurants, cafes and takeaways",
        "🍜",
        "#ef4444",
    )?;
    let income = seed_category(&conn, "Income", "Salary and other earnings", "💰", "#a855f7")?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();

    // Two months of activity so that both the current month and earlier
    // ranges have data.
    for week in 0..9 {
        let date = today - Duration::weeks(week);

        for (amount, description, category_id) in [
            (-142.35, "PAK N SAVE SUPERMARKET", Some(groceries)),
            (-450.0, "Weekly rent", Some(rent)),
            (-23.5, "AT HOP top up", Some(transport)),
            (-38.9, "Sushi takeaways with a description long enough to be truncated", Some(eating_out)),
            (-12.0, "Card fee", None),
        ] {
            create_transaction(
                Transaction::build(amount, date, description).category_id(category_id),
                &conn,
            )?;
        }

        if week % 2 == 0 {
            create_transaction(
                Transaction::build(2150.0, date, "Salary").category_id(Some(income)),
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}

fn seed_category(
    conn: &Connection,
    name: &str,
    description: &str,
    icon: &str,
    color: &str,
) -> Result<i64, Box<dyn Error>> {
    let category = create_category(
        Category::build(CategoryName::new(name)?)
            .description(description)
            .icon(icon)
            .color(color),
        conn,
    )?;

    Ok(category.id)
}
