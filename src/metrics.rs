// Profit figures. The same formula serves single rows and summed totals:
// aggregates are always summed first and divided once.

pub fn profit(sales: f64, cost: f64) -> f64 {
    sales - cost
}

/// Profit as a percentage of sales; zero when there are no sales.
pub fn profit_ratio(sales: f64, cost: f64) -> f64 {
    if sales == 0.0 {
        0.0
    } else {
        profit(sales, cost) / sales * 100.0
    }
}

pub fn derive(sales: f64, cost: f64) -> (f64, f64) {
    (profit(sales, cost), profit_ratio(sales, cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sales_gives_zero_ratio() {
        assert_eq!(profit_ratio(0.0, 0.0), 0.0);
        assert_eq!(profit_ratio(0.0, 5000.0), 0.0);
        assert_eq!(profit(0.0, 5000.0), -5000.0);
    }

    #[test]
    fn ratio_over_sales() {
        let (p, r) = derive(200.0, 150.0);
        assert_eq!(p, 50.0);
        assert_eq!(r, 25.0);
        assert_eq!(profit_ratio(100.0, 130.0), -30.0);
    }
}
