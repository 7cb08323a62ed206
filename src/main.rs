//! Interactive terminal front-end for Kasir POS.
//!
//! Wires the service graph (API client, credential storage, app shell)
//! and drives it with a line-based command loop. All POS behaviour lives
//! in the library; this binary is presentation only.

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kasir_pos::api::ApiClient;
use kasir_pos::app::{App, AppEvent, Screen, Tab};
use kasir_pos::config::Config;
use kasir_pos::format::{format_order_date, format_rupiah};
use kasir_pos::models::Order;
use kasir_pos::receipt::{render_receipt, ConsolePrinter, ReceiptConfig, ReceiptPrinter};
use kasir_pos::storage::{KeyringTokenStore, TokenCell};

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kasir_pos=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::from_env();
    info!(
        api = %config.api_base_url,
        "Starting Kasir POS v{}",
        env!("CARGO_PKG_VERSION")
    );

    let tokens = Arc::new(TokenCell::default());
    let backend =
        Arc::new(ApiClient::new(&config, tokens.clone()).context("failed to build API client")?);
    let app = App::new(backend, tokens, Box::new(KeyringTokenStore::new()));

    app.subscribe(|event| match event {
        AppEvent::ScreenChanged(screen) => tracing::debug!(?screen, "screen changed"),
        AppEvent::OrderSettled(order) => {
            tracing::debug!(order_id = %order.id, "order settled")
        }
        AppEvent::SessionEnded => tracing::debug!("session ended"),
    });

    app.startup().await;
    println!("Kasir POS. Ketik 'help' untuk daftar perintah.");
    show_screen(&app);

    let receipt_cfg = ReceiptConfig::default();
    let printer = ConsolePrinter;
    let mut last_order: Option<Order> = None;

    let stdin = io::stdin();
    loop {
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => help(),
            "login" => match args.as_slice() {
                [username, password] => match app.login(username, password).await {
                    Ok(user) => {
                        println!("Selamat datang, {} ({}).", user.name, user.role);
                        show_screen(&app);
                    }
                    Err(e) => println!("! {}", e.detail()),
                },
                _ => println!("Pemakaian: login <username> <password>"),
            },
            "logout" => {
                app.logout();
                show_screen(&app);
            }
            "menu" => {
                app.select_tab(Tab::Cashier).await;
                show_menu(&app, args.first().copied());
            }
            "cat" => show_categories(&app),
            "add" => match args.as_slice() {
                [id] => match app.add_to_cart(id) {
                    Ok(qty) => println!("Ditambahkan, jumlah sekarang {qty}."),
                    Err(e) => println!("! {}", e.detail()),
                },
                _ => println!("Pemakaian: add <menu_id>"),
            },
            "qty" => match args.as_slice() {
                [id, qty] => match qty.parse::<i64>() {
                    Ok(q) => {
                        app.set_cart_quantity(id, q);
                        show_cart(&app);
                    }
                    Err(_) => println!("! Jumlah tidak valid"),
                },
                _ => println!("Pemakaian: qty <menu_id> <jumlah>"),
            },
            "cart" => show_cart(&app),
            "pay" => match args.as_slice() {
                [] => match app.begin_payment() {
                    Ok(prompt) => {
                        println!("Total {}", format_rupiah(prompt.total));
                        let suggestions: Vec<String> = prompt
                            .quick_amounts
                            .iter()
                            .map(|a| format_rupiah(*a))
                            .collect();
                        println!("Uang pas: {}", suggestions.join(" / "));
                        println!("Lanjutkan dengan: pay <jumlah>");
                    }
                    Err(e) => println!("! {}", e.detail()),
                },
                [amount] => {
                    if let Err(e) = app.begin_payment() {
                        println!("! {}", e.detail());
                        continue;
                    }
                    match app.submit_payment(amount).await {
                        Ok(order) => {
                            let rendered = render_receipt(&order, &receipt_cfg);
                            if let Err(e) = printer.print(&rendered) {
                                println!("! {}", e.detail());
                            }
                            last_order = Some(order);
                        }
                        Err(e) => println!("! {}", e.detail()),
                    }
                }
                _ => println!("Pemakaian: pay [jumlah]"),
            },
            "cancel" => {
                app.cancel_payment();
                println!("Pembayaran dibatalkan.");
            }
            "print" => match &last_order {
                Some(order) => {
                    let rendered = render_receipt(order, &receipt_cfg);
                    if let Err(e) = printer.print(&rendered) {
                        println!("! {}", e.detail());
                    }
                }
                None => println!("Belum ada struk untuk dicetak."),
            },
            "reports" => {
                app.select_tab(Tab::Reports).await;
                show_reports(&app);
            }
            "quit" | "exit" => break,
            _ => println!("Perintah tidak dikenal: {command}. Ketik 'help'."),
        }
    }

    Ok(())
}

fn help() {
    println!("Perintah:");
    println!("  login <username> <password>   masuk sebagai kasir");
    println!("  logout                        keluar dari sesi");
    println!("  menu [kategori]               tampilkan menu");
    println!("  cat                           tampilkan kategori");
    println!("  add <menu_id>                 tambah item ke keranjang");
    println!("  qty <menu_id> <jumlah>        ubah jumlah (0 menghapus)");
    println!("  cart                          tampilkan keranjang");
    println!("  pay [jumlah]                  mulai / selesaikan pembayaran");
    println!("  cancel                        batalkan pembayaran");
    println!("  print                         cetak ulang struk terakhir");
    println!("  reports                       laporan penjualan");
    println!("  quit                          tutup terminal");
}

fn show_screen(app: &App) {
    match app.screen() {
        Screen::Loading => println!("Memuat sesi..."),
        Screen::Login => println!("Silakan login: login <username> <password>"),
        Screen::Dashboard(Tab::Cashier) => println!("Tab kasir aktif. Ketik 'menu' untuk mulai."),
        Screen::Dashboard(Tab::Reports) => println!("Tab laporan aktif."),
    }
}

fn show_menu(app: &App, category: Option<&str>) {
    let items = app.catalog().items(category);
    if items.is_empty() {
        println!("(menu kosong)");
        return;
    }
    for item in items {
        println!(
            "{:<10} {:<28} {:>12}  [{}]",
            item.id,
            item.name,
            format_rupiah(item.price),
            item.category
        );
    }
}

fn show_categories(app: &App) {
    for c in app.catalog().categories() {
        println!("{:<20} {} item", c.category, c.count);
    }
}

fn show_cart(app: &App) {
    let lines = app.cart_lines();
    if lines.is_empty() {
        println!("(keranjang kosong)");
        return;
    }
    for line in &lines {
        println!(
            "{:<10} {:<24} {:>3} x {:>12} = {:>12}",
            line.menu_item_id,
            line.name,
            line.quantity,
            format_rupiah(line.price),
            format_rupiah(line.subtotal())
        );
    }
    println!("Total: {}", format_rupiah(app.cart_total()));
}

fn show_reports(app: &App) {
    match app.reports().stats() {
        Some(stats) => {
            println!(
                "Hari ini : {} order, {}",
                stats.today.orders,
                format_rupiah(stats.today.revenue)
            );
            println!(
                "Semua    : {} order, {}",
                stats.all_time.orders,
                format_rupiah(stats.all_time.revenue)
            );
        }
        None => println!("(statistik belum tersedia)"),
    }

    let popular = app.reports().popular_items();
    if !popular.is_empty() {
        println!("Menu terlaris hari ini:");
        for item in popular {
            println!("  {:<28} x{}", item.name, item.quantity);
        }
    }

    let recent = app.reports().recent_orders();
    if !recent.is_empty() {
        println!("Order terakhir:");
        for order in recent {
            let local = order.order_date.with_timezone(&chrono::Local);
            println!(
                "  {}  {:<18} {:>12}  {}",
                format_order_date(&local),
                order.cashier_name,
                format_rupiah(order.total_amount),
                order.status
            );
        }
    }
}
