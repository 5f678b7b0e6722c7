use dwd_opendata::{Dwd, LatLon, Resolution, Variable};
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    configure_polars_display();
    let client = Dwd::new().await?;

    let roster = client
        .load_roster()
        .variable(Variable::AirTemperature)
        .resolution(Resolution::Daily)
        .call()
        .await?;
    for (station, km) in roster.nearest(LatLon(47.66, 9.18), 3, 50.0) {
        println!("{:>6.1} km  {} ({})", km, station.name, station.id);
    }

    let collection = client
        .load_collection()
        .stations(&["Konstanz"])
        .variables(&[
            Variable::AirTemperature,
            Variable::Precipitation,
            Variable::Sun,
        ])
        .resolution(Resolution::Daily)
        .start("2015".parse().expect("valid year"))
        .end("2016".parse().expect("valid year"))
        .call()
        .await?;

    let frame = collection.to_dataframe()?;
    println!("{:#?}", frame);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
