use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use fluxo_rs::{
    EntryKind, Name, NewCard, NewCategory, NewEntry, NewJar, NewSupplier, PaymentMethod,
    StatementLine, TaxId, apply_entry_create, create_card, create_category, create_jar,
    create_supplier, initialize_db, transfer_to_jar,
};

/// A utility for creating a test database for the web server of fluxo_rs.
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
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let category = |name: &str, statement_line: StatementLine| NewCategory {
        name: Name::new_unchecked(name),
        description: String::new(),
        parent_id: None,
        statement_line: Some(statement_line),
    };
    let sales = create_category(category("Sales", StatementLine::Revenue), &conn)?;
    let ingredients = create_category(
        category("Ingredients", StatementLine::CostOfSales),
        &conn,
    )?;
    let utilities = create_category(
        category("Utilities", StatementLine::OperatingExpense),
        &conn,
    )?;
    let wages = create_category(
        category("Wages", StatementLine::AdministrativeExpense),
        &conn,
    )?;
    let bank_fees = create_category(
        category("Bank fees", StatementLine::FinancialExpense),
        &conn,
    )?;

    println!("Creating suppliers...");
    let mill = create_supplier(
        NewSupplier {
            name: Name::new_unchecked("Moinho Central"),
            tax_id: Some(TaxId::new("12345678000190")?),
            contact: "vendas@moinho.example".to_owned(),
        },
        &conn,
    )?;
    let power = create_supplier(
        NewSupplier {
            name: Name::new_unchecked("Companhia de Energia"),
            tax_id: None,
            contact: String::new(),
        },
        &conn,
    )?;

    println!("Creating credit card...");
    let card = create_card(
        NewCard {
            name: Name::new_unchecked("Company Visa"),
            total_limit: Decimal::new(5000, 0),
            closing_day: 5,
            due_day: 12,
            is_active: true,
            notes: String::new(),
        },
        &conn,
    )?;

    println!("Creating savings jars...");
    let reserve = create_jar(
        NewJar {
            name: Name::new_unchecked("Emergency reserve"),
            purpose: "Three months of fixed costs".to_owned(),
            target: Decimal::new(10_000, 0),
        },
        &conn,
    )?;
    create_jar(
        NewJar {
            name: Name::new_unchecked("New oven"),
            purpose: String::new(),
            target: Decimal::new(4500, 0),
        },
        &conn,
    )?;

    println!("Creating entries...");
    let today = OffsetDateTime::now_utc().date();
    // Amounts are given in cents.
    let entry = |description: &str, kind: EntryKind, cents: i64, days_ago: i64| {
        NewEntry::new(
            description,
            kind,
            Decimal::new(cents, 2),
            today - Duration::days(days_ago),
        )
    };

    for week in 0..8 {
        let offset = week * 7;
        let entries = [
            entry("Daily sales", EntryKind::Inflow, 185_000, offset)
                .payment_method(PaymentMethod::InstantTransfer)
                .category(sales.id),
            entry("Counter sales", EntryKind::Inflow, 62_050, offset + 1)
                .payment_method(PaymentMethod::Cash)
                .category(sales.id),
            entry("Flour and sugar", EntryKind::Outflow, 41_990, offset + 2)
                .card(card.id)
                .category(ingredients.id)
                .supplier(mill.id),
            entry("Staff wages", EntryKind::Outflow, 90_000, offset + 3)
                .payment_method(PaymentMethod::InstantTransfer)
                .category(wages.id),
        ];

        for new_entry in entries {
            apply_entry_create(&new_entry, &mut conn)?;
        }
    }

    let entries = [
        entry("Electricity", EntryKind::Outflow, 38_745, 10)
            .payment_method(PaymentMethod::DebitCard)
            .category(utilities.id)
            .supplier(power.id),
        entry("Card machine fees", EntryKind::Outflow, 4_320, 12)
            .payment_method(PaymentMethod::InstantTransfer)
            .category(bank_fees.id),
        entry("Neighbour's order", EntryKind::Inflow, 12_000, 4)
            .payment_method(PaymentMethod::Tab)
            .category(sales.id),
    ];

    for new_entry in entries {
        apply_entry_create(&new_entry, &mut conn)?;
    }

    transfer_to_jar(reserve.id, Decimal::new(1500, 0), today, &mut conn)?;

    println!("Success!");

    Ok(())
}
