//! RevLib `.real` writer.

use crate::circuit::Circuit;

/// Render a circuit in RevLib `.real` format (version 2.0).
pub fn to_real(circuit: &Circuit) -> String {
    let mut writer = RealWriter::default();
    writer.write_circuit(circuit);
    writer.output
}

#[derive(Default)]
struct RealWriter {
    output: String,
}

impl RealWriter {
    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn write_circuit(&mut self, circuit: &Circuit) {
        self.writeln(".version 2.0");
        self.writeln(&format!(".numvars {}", circuit.num_lines()));

        let variables: Vec<String> = circuit.lines().iter().map(|l| l.id.to_string()).collect();
        self.writeln(&format!(".variables {}", variables.join(" ")));

        let inputs: Vec<String> = circuit.inputs().map(quote).collect();
        self.writeln(&format!(".inputs {}", inputs.join(" ")));

        let outputs: Vec<String> = circuit.outputs().map(quote).collect();
        self.writeln(&format!(".outputs {}", outputs.join(" ")));

        let constants: String = circuit
            .constants()
            .map(|c| match c {
                Some(true) => '1',
                Some(false) => '0',
                None => '-',
            })
            .collect();
        self.writeln(&format!(".constants {constants}"));

        let garbage: String = circuit
            .garbage()
            .map(|g| if g { '1' } else { '-' })
            .collect();
        self.writeln(&format!(".garbage {garbage}"));

        self.writeln(".begin");
        for gate in circuit.gates() {
            self.writeln(&gate.to_string());
        }
        self.writeln(".end");
    }
}

fn quote(name: &str) -> String {
    if name.contains(' ') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}
