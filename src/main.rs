use dice_equation::parse_roll_equation;
use host_adapters::{AdapterContext, HostAdapter, InlineRollAdapter, DEFAULT_THEME};

const USAGE: &str = "usage: dice-bridge <equation> [values] [theme]
       dice-bridge --inline <fragment> [theme]

  values is a comma separated list of face values already rolled by the
  host, e.g. 12,9. Without values the remote service rolls the dice.";

fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let conversion = match args.split_first() {
        Some((first, rest)) if first == "--inline" => {
            let fragment = match rest.get(0) {
                Some(fragment) => fragment,
                None => exit_usage(),
            };
            let theme = rest.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_THEME);
            InlineRollAdapter.convert(fragment, &AdapterContext::new(theme))
        }
        Some((equation, rest)) => {
            let values: Vec<i64> = rest
                .get(0)
                .map(|list| {
                    list.split(',')
                        .filter_map(|value| value.trim().parse().ok())
                        .collect()
                })
                .unwrap_or_else(Vec::new);
            let theme = rest.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_THEME);
            parse_roll_equation(equation, theme, &values)
        }
        None => exit_usage(),
    };

    match conversion {
        Ok(conversion) => {
            if conversion.dice.is_empty() {
                log::info!("equation contains no dice, nothing to roll");
            }
            let request = conversion.into_request();
            println!(
                "{}",
                serde_json::to_string_pretty(&request).expect("roll request serializes")
            );
        }
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}

fn exit_usage() -> ! {
    eprintln!("{}", USAGE);
    std::process::exit(2);
}
