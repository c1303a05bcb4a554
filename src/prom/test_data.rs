//! Shared exposition fixture for the parser and index tests, shaped after a
//! node exporter scrape. Contains two deliberately broken lines.

pub(crate) const NODE_EXPOSITION: &str = r#"# HELP node_cpu_seconds_total Seconds the CPUs spent in each mode.
# TYPE node_cpu_seconds_total counter
node_cpu_seconds_total{cpu="0",mode="idle"} 312.4
node_cpu_seconds_total{cpu="0",mode="user"} 48.7
node_cpu_seconds_total{cpu="1",mode="idle"} 299.1
node_cpu_seconds_total{cpu="1",mode="user"} 51.3

# HELP node_load1 1m load average.
# TYPE node_load1 gauge
node_load1 0.42
node_load1_broken_no_value

# HELP node_network_transmit_bytes_total Network device statistic transmit_bytes.
# TYPE node_network_transmit_bytes_total counter
node_network_transmit_bytes_total{device="eth0"} 1.23e+07
node_network_transmit_bytes_total{device="lo"} not_a_number

# HELP go_goroutines Number of goroutines that currently exist.
# TYPE go_goroutines gauge
go_goroutines 8

# HELP up Whether the scrape succeeded.
# TYPE up gauge
up 1
"#;
