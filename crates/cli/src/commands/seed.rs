//! Seed the database with demo accounts, the menu and sample orders.
//!
//! Existing users (by email) and products (by name) are left alone, so the
//! command can be run repeatedly. Sample orders are only created when the
//! demo customer has none.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;

use ipufood_core::{Email, OrderStatus, PaymentMethod, Phone, Price, UserRole};
use ipufood_server::db::{OrderRepository, ProductRepository, UserRepository};
use ipufood_server::models::{Cart, CurrentUser, NewProduct, NewUser, Product, User};
use ipufood_server::services::auth::hash_password;
use ipufood_server::services::checkout::build_order;

use super::{CliError, connect};

struct DemoUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    phone: &'static str,
    address: &'static str,
    role: UserRole,
}

const ADMIN: DemoUser = DemoUser {
    name: "Administrador",
    email: "admin@ipufood.com",
    password: "admin123",
    phone: "(84) 99999-0000",
    address: "Rua Principal, 1 - Centro",
    role: UserRole::Admin,
};

const CUSTOMER: DemoUser = DemoUser {
    name: "Cliente Teste",
    email: "cliente@ipufood.com",
    password: "cliente123",
    phone: "84981568463",
    address: "Av. Central, 100 - Centro",
    role: UserRole::User,
};

/// (name, description, price in cents, category)
const MENU: [(&str, &str, u32, &str); 5] = [
    (
        "X-Burger",
        "Hambúrguer artesanal com queijo, alface e tomate",
        1500,
        "Lanches",
    ),
    (
        "Batata Frita",
        "Porção de batata frita crocante",
        1200,
        "Acompanhamentos",
    ),
    (
        "Pizza Margherita",
        "Molho de tomate, mussarela e manjericão",
        2500,
        "Pizzas",
    ),
    ("Refrigerante", "Lata 350ml", 800, "Bebidas"),
    ("Sorvete", "Duas bolas, sabores do dia", 800, "Sobremesas"),
];

/// Seed users and products, plus sample orders when `with_orders` is set.
pub async fn run(with_orders: bool) -> Result<(), CliError> {
    let pool = connect().await?;

    seed_user(&pool, &ADMIN).await?;
    let customer = seed_user(&pool, &CUSTOMER).await?;
    let menu = seed_menu(&pool).await?;

    if with_orders {
        seed_orders(&pool, &customer, &menu).await?;
    }

    info!("Seeding complete!");
    info!("  Admin:    {} / {}", ADMIN.email, ADMIN.password);
    info!("  Customer: {} / {}", CUSTOMER.email, CUSTOMER.password);
    Ok(())
}

async fn seed_user(pool: &PgPool, demo: &DemoUser) -> Result<User, CliError> {
    let email = Email::parse(demo.email).map_err(|e| CliError::Seed(e.to_string()))?;
    let users = UserRepository::new(pool);

    if let Some(user) = users.get_by_email(&email).await? {
        info!("User {} already exists, skipping", user.email);
        return Ok(user);
    }

    let new_user = NewUser {
        name: demo.name.to_owned(),
        email,
        phone: Phone::parse(demo.phone).map_err(|e| CliError::Seed(e.to_string()))?,
        address: demo.address.to_owned(),
        role: demo.role,
    };
    let password_hash = hash_password(demo.password)?;
    let user = users
        .create_with_password(&new_user, &password_hash)
        .await?;

    info!("Created user {} ({})", user.email, user.role);
    Ok(user)
}

async fn seed_menu(pool: &PgPool) -> Result<HashMap<&'static str, Product>, CliError> {
    let products = ProductRepository::new(pool);
    let mut menu = HashMap::new();

    for (name, description, cents, category) in MENU {
        let product = if let Some(existing) = products.get_by_name(name).await? {
            info!("Product {name} already exists, skipping");
            existing
        } else {
            let created = products
                .create(&NewProduct {
                    name: name.to_owned(),
                    description: description.to_owned(),
                    price: Price::from_cents(cents),
                    image_url: None,
                    category: Some(category.to_owned()),
                    available: true,
                })
                .await?;
            info!("Created product {} ({})", created.name, created.price);
            created
        };
        menu.insert(name, product);
    }

    Ok(menu)
}

async fn seed_orders(
    pool: &PgPool,
    customer: &User,
    menu: &HashMap<&'static str, Product>,
) -> Result<(), CliError> {
    let orders = OrderRepository::new(pool);

    if !orders.list_for_user(customer.id).await?.is_empty() {
        info!("{} already has orders, skipping", customer.email);
        return Ok(());
    }

    let buyer = CurrentUser::from(customer);
    let samples = [
        (
            &[("X-Burger", 2), ("Refrigerante", 1)][..],
            PaymentMethod::Credit,
            OrderStatus::Delivered,
        ),
        (
            &[("Pizza Margherita", 1), ("Sorvete", 1)][..],
            PaymentMethod::Pix,
            OrderStatus::Pending,
        ),
    ];

    for (lines, payment_method, status) in samples {
        let mut cart = Cart::new();
        for &(name, quantity) in lines {
            let product = menu
                .get(name)
                .cloned()
                .ok_or_else(|| CliError::Seed(format!("missing product {name}")))?;
            cart.add(product, quantity)
                .map_err(|e| CliError::Seed(e.to_string()))?;
        }

        let new_order = build_order(Some(&buyer), &cart, payment_method)
            .map_err(|e| CliError::Seed(e.to_string()))?;
        let mut order = orders.create(&new_order).await?;
        if status != order.status {
            order = orders.update_status(order.id, status).await?;
        }

        info!(
            "Created order #{} ({}, {})",
            order.id, order.total, order.status
        );
    }

    Ok(())
}
