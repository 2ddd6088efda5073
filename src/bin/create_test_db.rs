use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use mibalance_rs::{
    PasswordHash, TransactionType, ValidatedPassword,
    budget::{NewBudget, upsert_budget},
    category::{Category, CategoryId},
    create_default_categories, initialize_db,
    savings_goal::{NewSavingsGoal, add_money_to_savings_goal, create_savings_goal},
    transaction::{Transaction, create_transaction},
    user::create_user,
};

/// A utility for creating a test database for the REST API server of mibalance_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_EMAIL: &str = "demo@mibalance.com";
const DEMO_PASSWORD: &str = "password123";

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

    println!("Creating demo user {DEMO_EMAIL}...");

    let password_hash =
        PasswordHash::new(ValidatedPassword::new_unchecked(DEMO_PASSWORD), bcrypt::DEFAULT_COST)?;
    let user = create_user("Usuario Demo", DEMO_EMAIL, password_hash, &conn)?;
    let categories = create_default_categories(user.id, &conn)?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    let transactions = [
        ("Salario", "3500000", TransactionType::Income, 25, "Salario mensual"),
        ("Freelance", "800000", TransactionType::Income, 12, "Proyecto web"),
        ("Alimentación", "450000", TransactionType::Expense, 3, "Mercado del mes"),
        ("Transporte", "120000", TransactionType::Expense, 5, "Gasolina"),
        ("Entretenimiento", "85000", TransactionType::Expense, 8, "Cine y cena"),
        ("Hogar", "1200000", TransactionType::Expense, 20, "Arriendo"),
        ("Salud", "60000", TransactionType::Expense, 40, "Medicamentos"),
        ("Salario", "3500000", TransactionType::Income, 55, "Salario mensual"),
        ("Alimentación", "380000", TransactionType::Expense, 45, "Mercado"),
    ];

    for (category_name, amount, transaction_type, days_ago, description) in transactions {
        let builder = Transaction::build(
            amount.parse::<Decimal>()?,
            transaction_type,
            today - Duration::days(days_ago),
        )
        .description(description)
        .category_id(Some(find_category(&categories, category_name)?));

        create_transaction(user.id, builder, &conn)?;
    }

    println!("Creating savings goals...");

    let goals = [
        ("Fondo de emergencia", "10000000", Some(180), "2500000"),
        ("Vacaciones", "3000000", Some(90), "3000000"),
        ("Computador nuevo", "4500000", None, "1200000"),
    ];

    for (name, target_amount, days_left, saved) in goals {
        let goal = create_savings_goal(
            user.id,
            NewSavingsGoal {
                name: name.to_owned(),
                target_amount: target_amount.parse()?,
                target_date: days_left.map(|days| today + Duration::days(days)),
            },
            &conn,
        )?;

        add_money_to_savings_goal(goal.id, user.id, saved.parse()?, &conn)?;
    }

    println!("Creating budgets...");

    let budgets = [
        ("Alimentación", "600000"),
        ("Transporte", "200000"),
        ("Entretenimiento", "50000"),
        ("Hogar", "1200000"),
    ];

    for (category_name, amount) in budgets {
        upsert_budget(
            user.id,
            NewBudget {
                category_id: find_category(&categories, category_name)?,
                budget_amount: amount.parse()?,
                month: today.month() as u8,
                year: today.year(),
            },
            &conn,
        )?;
    }

    println!("Success! Log in with {DEMO_EMAIL} / {DEMO_PASSWORD}");

    Ok(())
}

fn find_category(categories: &[Category], name: &str) -> Result<CategoryId, String> {
    categories
        .iter()
        .find(|category| category.name == name)
        .map(|category| category.id)
        .ok_or_else(|| format!("missing default category {name}"))
}
