use stock_portfolio_core::models::portfolio::Portfolio;
use stock_portfolio_core::models::report::{
    total_current_value, total_projected_value, ProjectionRow, ValuationRow,
};

pub fn render_holdings(portfolio: &Portfolio) {
    if portfolio.is_empty() {
        println!("No holdings.");
        return;
    }

    println!(
        "{:<10} {:>10} {:>14} {:>14} {:<12} {}",
        "Symbol", "Quantity", "Purchase Price", "Cost Basis", "Purchased", "Sector"
    );
    for (symbol, holding) in portfolio.iter() {
        println!(
            "{:<10} {:>10} {:>14.2} {:>14.2} {:<12} {}",
            symbol,
            holding.quantity,
            holding.purchase_price,
            holding.cost_basis(),
            holding.purchase_date.to_string(),
            holding.sector
        );
    }
    println!(
        "Total cost basis: {:.2}",
        portfolio.iter().map(|(_, h)| h.cost_basis()).sum::<f64>()
    );
}

pub fn render_valuation(rows: &[ValuationRow], holding_count: usize) {
    println!(
        "{:<10} {:>10} {:>14} {:<12} {:<14} {:>13} {:>15} {:>9}",
        "Symbol",
        "Quantity",
        "Purchase Price",
        "Purchased",
        "Sector",
        "Current Price",
        "Current Value",
        "CAGR"
    );
    for row in rows {
        println!(
            "{:<10} {:>10} {:>14.2} {:<12} {:<14} {:>13.2} {:>15.2} {:>8.2}%",
            row.symbol,
            row.quantity,
            row.purchase_price,
            row.purchase_date.to_string(),
            row.sector,
            row.current_price,
            row.current_value,
            row.cagr_pct()
        );
    }
    println!("Total current value: {:.2}", total_current_value(rows));
    render_skipped(rows.len(), holding_count);
}

pub fn render_projection(rows: &[ProjectionRow], rate: f64, holding_count: usize) {
    println!("Expected rate of return: {:.2}%", rate * 100.0);
    println!("{:<10} {:>15} {:>17}", "Symbol", "Current Value", "Projected Value");
    for row in rows {
        println!(
            "{:<10} {:>15.2} {:>17.2}",
            row.symbol, row.current_value, row.projected_value
        );
    }
    println!(
        "Total: {:.2} -> {:.2}",
        rows.iter().map(|r| r.current_value).sum::<f64>(),
        total_projected_value(rows)
    );
    render_skipped(rows.len(), holding_count);
}

fn render_skipped(rendered: usize, holding_count: usize) {
    let skipped = holding_count.saturating_sub(rendered);
    if skipped > 0 {
        println!("{skipped} holding(s) left out: no quote available (run with -v for details).");
    }
}
